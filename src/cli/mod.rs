pub mod commands;

use tracing_subscriber::EnvFilter;

use crate::config::simulation::SimulationConfig;

/// Install the global tracing subscriber. `RUST_LOG` overrides `log_level`.
pub fn init_logging(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("floe={}", config.log_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if config.log_format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
