use std::collections::HashMap;

use crate::agent::{Agent, Species, Status};

/// Per-tick population counts for introspection and the stop rule.
#[derive(Debug, Clone)]
pub struct PopulationStatistics {
    pub tick: u64,
    pub registered: HashMap<Species, u32>,
    pub by_status: HashMap<(Species, Status), u32>,
    pub catches: u32,
    pub tick_duration_ms: f32,
}

impl PopulationStatistics {
    pub fn registered(&self, species: Species) -> u32 {
        self.registered.get(&species).copied().unwrap_or(0)
    }

    pub fn count(&self, species: Species, status: Status) -> u32 {
        self.by_status.get(&(species, status)).copied().unwrap_or(0)
    }

    /// Registered agents of a species that are not dead.
    pub fn live(&self, species: Species) -> u32 {
        self.registered(species) - self.count(species, Status::Dead)
    }

    /// One-line summary, e.g. `tick 12 | fish 180/200 | penguin 1/1 | seal 0/0 | catches 1`.
    pub fn summary_line(&self) -> String {
        let mut line = format!("tick {}", self.tick);
        for species in Species::all() {
            line.push_str(&format!(
                " | {} {}/{}",
                species.name(),
                self.live(species),
                self.registered(species)
            ));
        }
        line.push_str(&format!(" | catches {}", self.catches));
        line
    }
}

/// Count the population after a tick.
pub fn compute_statistics(
    tick: u64,
    agents: &[Agent],
    catches: u32,
    tick_duration_ms: f32,
) -> PopulationStatistics {
    let mut registered: HashMap<Species, u32> = HashMap::new();
    let mut by_status: HashMap<(Species, Status), u32> = HashMap::new();

    for agent in agents {
        *registered.entry(agent.species()).or_insert(0) += 1;
        *by_status
            .entry((agent.species(), agent.status()))
            .or_insert(0) += 1;
    }

    PopulationStatistics {
        tick,
        registered,
        by_status,
        catches,
        tick_duration_ms,
    }
}
