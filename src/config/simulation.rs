use serde::Deserialize;
use std::path::Path;

/// When a run ends before `total_ticks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRule {
    /// Stop once every penguin is dead.
    LivePenguins,
    /// Stop when no penguin is registered at all. Penguins are never
    /// unregistered, so this only fires when none were placed.
    RegisteredPenguins,
    Never,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_total_ticks")]
    pub total_ticks: u64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_stop_rule")]
    pub stop_rule: StopRule,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

fn default_total_ticks() -> u64 {
    300
}
fn default_stop_rule() -> StopRule {
    StopRule::LivePenguins
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_output_path() -> String {
    "./output/ticks.jsonl".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            total_ticks: default_total_ticks(),
            seed: 0,
            stop_rule: default_stop_rule(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            output_path: default_output_path(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.total_ticks == 0 {
            errors.push(format!(
                "total_ticks must be > 0, got {}. Example: total_ticks = 300",
                self.total_ticks
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            errors.push(format!(
                "log_format must be one of {:?}, got '{}'. Example: log_format = \"pretty\"",
                valid_formats, self.log_format
            ));
        }

        if self.output_path.trim().is_empty() {
            errors.push(
                "output_path must not be empty. Example: output_path = \"./output/ticks.jsonl\""
                    .to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}
