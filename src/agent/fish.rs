use rand::Rng;

use crate::agent::{Behavior, Catch, Species, Status, StepContext};
use crate::error::SimError;
use crate::simulation::movement::{chase_or_home, escape, random_move, EscapeRoute};
use crate::world::{AgentId, Terrain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FishStatus {
    Alive,
    Dead,
}

impl From<FishStatus> for Status {
    fn from(s: FishStatus) -> Status {
        match s {
            FishStatus::Alive => Status::Alive,
            FishStatus::Dead => Status::Dead,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fish {
    pub status: FishStatus,
}

impl Fish {
    pub fn new() -> Self {
        Fish {
            status: FishStatus::Alive,
        }
    }
}

impl Default for Fish {
    fn default() -> Self {
        Self::new()
    }
}

/// Flee from nearby penguins through water, otherwise drift around home.
///
/// The home drift is two-staged: a directed step towards home picks a
/// waypoint, and the fish then lands on a random water cell around that
/// waypoint rather than on the waypoint itself.
pub fn step<R: Rng + ?Sized>(
    id: AgentId,
    ctx: &mut StepContext<'_, R>,
) -> Result<Option<Catch>, SimError> {
    let agent = ctx.agents[id];
    let Behavior::Fish(fish) = agent.behavior else {
        return Ok(None);
    };
    if fish.status == FishStatus::Dead {
        return Ok(None);
    }

    let eco = ctx.params;
    let params = &eco.fish;
    let weights = &eco.selection_weights;
    let penguins = ctx.nearby_positions(id, params.escape_alert, |a| {
        a.species() == Species::Penguin
    })?;

    let to = if !penguins.is_empty() {
        escape(
            ctx.world,
            agent.position,
            &penguins,
            params.run_speed,
            EscapeRoute::Confined(Terrain::Water),
            weights,
            ctx.rng,
        )?
    } else {
        let waypoint = chase_or_home(
            ctx.world,
            agent.position,
            agent.home,
            params.walk_speed,
            Some(Terrain::Water),
            weights,
            ctx.rng,
        )?;
        random_move(ctx.world, waypoint, params.walk_speed, Some(Terrain::Water), ctx.rng)?
    };

    ctx.move_agent(id, to)?;
    Ok(None)
}
