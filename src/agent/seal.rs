use rand::Rng;

use crate::agent::{Behavior, Catch, Species, Status, StepContext};
use crate::error::SimError;
use crate::simulation::movement::{chase_or_home, random_move};
use crate::simulation::selection::nearest_weighted;
use crate::world::{AgentId, Terrain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SealStatus {
    Hunt,
    Full,
}

impl From<SealStatus> for Status {
    fn from(s: SealStatus) -> Status {
        match s {
            SealStatus::Hunt => Status::Hunt,
            SealStatus::Full => Status::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seal {
    pub status: SealStatus,
}

impl Seal {
    pub fn new() -> Self {
        Seal {
            status: SealStatus::Hunt,
        }
    }
}

impl Default for Seal {
    fn default() -> Self {
        Self::new()
    }
}

/// Hunt the nearest living penguin through water; wander once fed.
pub fn step<R: Rng + ?Sized>(
    id: AgentId,
    ctx: &mut StepContext<'_, R>,
) -> Result<Option<Catch>, SimError> {
    let agent = ctx.agents[id];
    let Behavior::Seal(seal) = agent.behavior else {
        return Ok(None);
    };

    let eco = ctx.params;
    let params = &eco.seal;

    let penguins = if seal.status == SealStatus::Hunt {
        ctx.nearby_positions(id, params.hunt_alert, |a| {
            a.species() == Species::Penguin && a.status() != Status::Dead
        })?
    } else {
        Vec::new()
    };

    if penguins.is_empty() {
        let to = random_move(
            ctx.world,
            agent.position,
            params.wander_speed,
            Some(Terrain::Water),
            ctx.rng,
        )?;
        ctx.move_agent(id, to)?;
        return Ok(None);
    }

    let target = nearest_weighted(&penguins, agent.position, &eco.selection_weights, ctx.rng)?;
    let to = chase_or_home(
        ctx.world,
        agent.position,
        target,
        params.chase_speed,
        Some(Terrain::Water),
        &eco.selection_weights,
        ctx.rng,
    )?;

    let caught = ctx.pounce(id, to, Species::Penguin)?;
    if caught.is_some() {
        ctx.agents[id].behavior = Behavior::Seal(Seal {
            status: SealStatus::Full,
        });
    }
    Ok(caught)
}
