use clap::{Parser, Subcommand};
use std::path::Path;

use floe::cli::{self, commands};
use floe::config::ecology::EcologyParams;
use floe::config::simulation::SimulationConfig;

#[derive(Parser)]
#[command(name = "floe")]
#[command(about = "A predator-prey ecology of fish, penguins and seals on a water/land grid")]
#[command(version)]
struct Cli {
    /// Path to the run configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Path to the ecology parameter file
    #[arg(short, long, default_value = "ecology.toml")]
    ecology: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and write tick records as JSON lines
    Run {
        /// Override total_ticks
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Override the seed (0 draws a random one)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Override the output path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run seeded replicates in parallel and print their final populations
    Batch {
        /// Number of replicates
        #[arg(short, long)]
        replicates: usize,

        /// Base seed; replicate i runs with seed + i
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run a few ticks and print an ASCII frame of the grid
    Preview {
        /// Number of ticks to run
        #[arg(short, long, default_value_t = 50)]
        ticks: u64,

        /// Grid cells per character
        #[arg(long, default_value_t = 4)]
        cell: usize,
    },
}

/// Load a config file, falling back to defaults when the file is absent.
fn load_or_default<T: Default>(
    path: &str,
    load: impl Fn(&Path) -> Result<T, String>,
) -> Result<T, String> {
    let path = Path::new(path);
    if path.exists() {
        load(path)
    } else {
        Ok(T::default())
    }
}

fn main() {
    let cli = Cli::parse();

    let mut config = match load_or_default(&cli.config, SimulationConfig::from_file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    let ecology = match load_or_default(&cli.ecology, EcologyParams::from_file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading ecology parameters: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Run {
            ticks,
            seed,
            output,
        } => {
            if let Some(ticks) = ticks {
                config.total_ticks = ticks;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Err(e) = config.validate() {
                eprintln!("Error in command-line overrides: {}", e);
                std::process::exit(1);
            }
            cli::init_logging(&config);

            if let Err(e) = commands::run_simulation(&config, &ecology) {
                eprintln!("Simulation error: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Batch { replicates, seed } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            cli::init_logging(&config);

            match commands::run_batch(&config, &ecology, replicates) {
                Ok(outcomes) => commands::print_batch(&outcomes),
                Err(e) => {
                    eprintln!("Batch error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Preview { ticks, cell } => {
            config.total_ticks = ticks;
            if let Err(e) = config.validate() {
                eprintln!("Error in command-line overrides: {}", e);
                std::process::exit(1);
            }
            cli::init_logging(&config);

            match commands::preview(&config, &ecology, cell) {
                Ok(frame) => print!("{}", frame),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
