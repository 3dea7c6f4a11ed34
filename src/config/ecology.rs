use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest number of ranked candidates a selection policy draws from.
pub const MAX_RANKED_CANDIDATES: usize = 5;

/// Largest side length whose cell count still fits in an `i32`.
pub const MAX_MAP_SIZE: i32 = 46_340;

/// Half-open land rectangle `[x0, x1) x [y0, y1)` inside an otherwise-water map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandRegion {
    pub x: [i32; 2],
    pub y: [i32; 2],
}

impl Default for LandRegion {
    fn default() -> Self {
        LandRegion {
            x: [50, 80],
            y: [50, 100],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Population {
    pub fish: u32,
    pub penguin: u32,
    pub seal: u32,
}

impl Default for Population {
    fn default() -> Self {
        Population {
            fish: 200,
            penguin: 1,
            seal: 0,
        }
    }
}

/// Gaussian spawn sampling around `mean`.
///
/// `sigma` absent means `max(3, map_size / 10)`. `max_retries` absent means
/// the agent resamples until it lands on its terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnParams {
    pub mean: [f64; 2],
    #[serde(default)]
    pub sigma: Option<f64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl SpawnParams {
    pub fn sigma_for(&self, map_size: i32) -> f64 {
        self.sigma
            .unwrap_or_else(|| (map_size as f64 / 10.0).max(3.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishParams {
    pub walk_speed: f64,
    pub run_speed: f64,
    pub escape_alert: f64,
    pub spawn: SpawnParams,
}

impl Default for FishParams {
    fn default() -> Self {
        FishParams {
            walk_speed: 2.0,
            run_speed: 2.0,
            escape_alert: 15.0,
            spawn: SpawnParams {
                mean: [150.0, 50.0],
                sigma: None,
                max_retries: Some(50),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenguinParams {
    pub walk_speed: f64,
    pub run_speed: f64,
    pub escape_alert: f64,
    pub hunt_alert: f64,
    /// Mean starting energy and the level at which a tired penguin sprints again.
    pub energy: i32,
    /// Speed of the aimless walk while hunting with no fish in sight.
    /// Historically the fish walk speed.
    pub wander_speed: f64,
    pub spawn: SpawnParams,
}

impl Default for PenguinParams {
    fn default() -> Self {
        PenguinParams {
            walk_speed: 1.0,
            run_speed: 3.0,
            escape_alert: 10.0,
            hunt_alert: 50.0,
            energy: 30,
            wander_speed: 2.0,
            spawn: SpawnParams {
                mean: [70.0, 70.0],
                sigma: None,
                max_retries: Some(50),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealParams {
    pub hunt_alert: f64,
    /// Historically the penguin walk speed.
    pub wander_speed: f64,
    /// Historically the penguin run speed.
    pub chase_speed: f64,
    pub spawn: SpawnParams,
}

impl Default for SealParams {
    fn default() -> Self {
        SealParams {
            hunt_alert: 100.0,
            wander_speed: 1.0,
            chase_speed: 3.0,
            spawn: SpawnParams {
                mean: [10.0, 10.0],
                sigma: Some(3.0),
                max_retries: None,
            },
        }
    }
}

/// Static ecology: map geometry, populations and species parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcologyParams {
    #[serde(default = "default_map_size")]
    pub map_size: i32,
    #[serde(default)]
    pub land: LandRegion,
    #[serde(default)]
    pub population: Population,
    #[serde(default = "default_selection_weights")]
    pub selection_weights: Vec<f64>,
    #[serde(default)]
    pub fish: FishParams,
    #[serde(default)]
    pub penguin: PenguinParams,
    #[serde(default)]
    pub seal: SealParams,
}

fn default_map_size() -> i32 {
    200
}
fn default_selection_weights() -> Vec<f64> {
    vec![0.3, 0.3, 0.2, 0.1, 0.1]
}

impl Default for EcologyParams {
    fn default() -> Self {
        EcologyParams {
            map_size: default_map_size(),
            land: LandRegion::default(),
            population: Population::default(),
            selection_weights: default_selection_weights(),
            fish: FishParams::default(),
            penguin: PenguinParams::default(),
            seal: SealParams::default(),
        }
    }
}

impl EcologyParams {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let params: EcologyParams = toml::from_str(content)
            .map_err(|e| format!("Invalid TOML in {}: {}", source_path.display(), e))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.map_size < 1 || self.map_size > MAX_MAP_SIZE {
            errors.push(format!(
                "map_size must be in [1, {}], got {}. Example: map_size = 200",
                MAX_MAP_SIZE, self.map_size
            ));
        }

        let [x0, x1] = self.land.x;
        let [y0, y1] = self.land.y;
        if x0 < 0 || y0 < 0 || x1 > self.map_size || y1 > self.map_size || x0 >= x1 || y0 >= y1 {
            errors.push(format!(
                "land must be a non-empty rectangle inside the map, got x = {:?}, y = {:?}. \
                 Example: land = {{ x = [50, 80], y = [50, 100] }}",
                self.land.x, self.land.y
            ));
        }

        if self.selection_weights.is_empty()
            || self.selection_weights.len() > MAX_RANKED_CANDIDATES
            || self
                .selection_weights
                .iter()
                .any(|w| !w.is_finite() || *w <= 0.0)
        {
            errors.push(format!(
                "selection_weights must hold 1-{} positive numbers, got {:?}. \
                 Example: selection_weights = [0.3, 0.3, 0.2, 0.1, 0.1]",
                MAX_RANKED_CANDIDATES, self.selection_weights
            ));
        }

        let distances = [
            ("fish.walk_speed", self.fish.walk_speed),
            ("fish.run_speed", self.fish.run_speed),
            ("fish.escape_alert", self.fish.escape_alert),
            ("penguin.walk_speed", self.penguin.walk_speed),
            ("penguin.run_speed", self.penguin.run_speed),
            ("penguin.escape_alert", self.penguin.escape_alert),
            ("penguin.hunt_alert", self.penguin.hunt_alert),
            ("penguin.wander_speed", self.penguin.wander_speed),
            ("seal.hunt_alert", self.seal.hunt_alert),
            ("seal.wander_speed", self.seal.wander_speed),
            ("seal.chase_speed", self.seal.chase_speed),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{} must be >= 0.0, got {}", name, value));
            }
        }

        if self.penguin.energy <= 0 {
            errors.push(format!(
                "penguin.energy must be > 0, got {}. Example: energy = 30",
                self.penguin.energy
            ));
        }

        let spawns = [
            ("fish.spawn", &self.fish.spawn),
            ("penguin.spawn", &self.penguin.spawn),
            ("seal.spawn", &self.seal.spawn),
        ];
        for (name, spawn) in spawns {
            if spawn.mean.iter().any(|m| !m.is_finite()) {
                errors.push(format!("{}.mean must be finite, got {:?}", name, spawn.mean));
            }
            if let Some(sigma) = spawn.sigma {
                if !sigma.is_finite() || sigma <= 0.0 {
                    errors.push(format!("{}.sigma must be > 0.0, got {}", name, sigma));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}
