pub mod fish;
pub mod penguin;
pub mod seal;
pub mod spawn;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ecology::EcologyParams;
use crate::error::SimError;
use crate::world::{AgentId, Position, World};

pub use fish::{Fish, FishStatus};
pub use penguin::{Penguin, PenguinStatus};
pub use seal::{Seal, SealStatus};

// === Enums ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Fish,
    Penguin,
    Seal,
}

impl Species {
    pub fn all() -> [Species; 3] {
        [Species::Fish, Species::Penguin, Species::Seal]
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Fish => "fish",
            Species::Penguin => "penguin",
            Species::Seal => "seal",
        }
    }
}

/// Status as seen from outside, common to every species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Alive,
    Hunt,
    Full,
    Dead,
}

impl Status {
    pub fn name(self) -> &'static str {
        match self {
            Status::Alive => "alive",
            Status::Hunt => "hunt",
            Status::Full => "full",
            Status::Dead => "dead",
        }
    }
}

/// Species-specific state and behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Fish(Fish),
    Penguin(Penguin),
    Seal(Seal),
}

// === Agent ===

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    /// Unique within the species.
    pub id: u32,
    pub position: Position,
    pub home: Position,
    pub behavior: Behavior,
}

impl Agent {
    pub fn species(&self) -> Species {
        match self.behavior {
            Behavior::Fish(_) => Species::Fish,
            Behavior::Penguin(_) => Species::Penguin,
            Behavior::Seal(_) => Species::Seal,
        }
    }

    pub fn status(&self) -> Status {
        match &self.behavior {
            Behavior::Fish(f) => f.status.into(),
            Behavior::Penguin(p) => p.status.into(),
            Behavior::Seal(s) => s.status.into(),
        }
    }

    pub fn energy(&self) -> Option<i32> {
        match &self.behavior {
            Behavior::Penguin(p) => Some(p.energy),
            _ => None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.status() == Status::Dead
    }

    /// Mark as eaten. Seals have no dead state and are unaffected.
    fn kill(&mut self) {
        match &mut self.behavior {
            Behavior::Fish(f) => f.status = FishStatus::Dead,
            Behavior::Penguin(p) => p.status = PenguinStatus::Dead,
            Behavior::Seal(_) => {}
        }
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            species: self.species(),
            status: self.status(),
            position: self.position,
            energy: self.energy(),
        }
    }
}

/// Read-only view of an agent handed to collectors and exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: u32,
    pub species: Species,
    pub status: Status,
    pub position: Position,
    pub energy: Option<i32>,
}

/// A predator landing on its prey's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catch {
    pub predator: AgentId,
    pub prey: AgentId,
    pub cell: Position,
}

// === Step context ===

/// Everything an agent step may read or mutate.
///
/// There is no snapshot isolation: writes made by agents activated earlier in
/// the tick (moves, kills) are visible to every later step.
pub struct StepContext<'a, R: Rng + ?Sized> {
    pub world: &'a mut World,
    pub agents: &'a mut [Agent],
    pub params: &'a EcologyParams,
    pub rng: &'a mut R,
}

impl<R: Rng + ?Sized> StepContext<'_, R> {
    /// Positions of agents around `id` (its own cell excluded) that satisfy `filter`.
    pub fn nearby_positions(
        &self,
        id: AgentId,
        radius: f64,
        filter: impl Fn(&Agent) -> bool,
    ) -> Result<Vec<Position>, SimError> {
        let ids = self
            .world
            .index
            .neighbors(self.agents[id].position, radius, false)?;
        Ok(ids
            .into_iter()
            .map(|other| &self.agents[other])
            .filter(|a| filter(a))
            .map(|a| a.position)
            .collect())
    }

    pub fn move_agent(&mut self, id: AgentId, to: Position) -> Result<(), SimError> {
        let from = self.agents[id].position;
        self.world.index.relocate(id, from, to)?;
        self.agents[id].position = to;
        Ok(())
    }

    /// Move onto `to`, then kill the first `prey` standing there.
    pub fn pounce(
        &mut self,
        id: AgentId,
        to: Position,
        prey: Species,
    ) -> Result<Option<Catch>, SimError> {
        self.move_agent(id, to)?;
        let victim = self
            .world
            .index
            .occupants(to)?
            .iter()
            .copied()
            .find(|&other| other != id && self.agents[other].species() == prey);

        let Some(victim) = victim else {
            return Ok(None);
        };
        self.agents[victim].kill();
        debug!(
            predator = self.agents[id].id,
            predator_species = self.agents[id].species().name(),
            prey = self.agents[victim].id,
            x = to.x,
            y = to.y,
            "Catch"
        );
        Ok(Some(Catch {
            predator: id,
            prey: victim,
            cell: to,
        }))
    }
}

/// Run one agent's step for the current tick.
pub fn step<R: Rng + ?Sized>(
    id: AgentId,
    ctx: &mut StepContext<'_, R>,
) -> Result<Option<Catch>, SimError> {
    match ctx.agents[id].behavior {
        Behavior::Fish(_) => fish::step(id, ctx),
        Behavior::Penguin(_) => penguin::step(id, ctx),
        Behavior::Seal(_) => seal::step(id, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fish_at(x: i32, y: i32) -> Agent {
        Agent {
            id: 3,
            position: Position::new(x, y),
            home: Position::new(x, y),
            behavior: Behavior::Fish(Fish::new()),
        }
    }

    #[test]
    fn snapshot_carries_species_and_status() {
        let agent = fish_at(4, 5);
        let snap = agent.snapshot();
        assert_eq!(snap.id, 3);
        assert_eq!(snap.species, Species::Fish);
        assert_eq!(snap.status, Status::Alive);
        assert_eq!(snap.position, Position::new(4, 5));
        assert_eq!(snap.energy, None);
    }

    #[test]
    fn kill_marks_fish_and_penguins_only() {
        let mut fish = fish_at(0, 0);
        fish.kill();
        assert!(fish.is_dead());

        let mut seal = Agent {
            behavior: Behavior::Seal(Seal::new()),
            ..fish_at(0, 0)
        };
        seal.kill();
        assert_eq!(seal.status(), Status::Hunt);
    }

    #[test]
    fn species_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Species::Penguin).unwrap(), "\"penguin\"");
        assert_eq!(serde_json::to_string(&Status::Full).unwrap(), "\"full\"");
    }
}
