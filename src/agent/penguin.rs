use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::agent::{Behavior, Catch, Species, Status, StepContext};
use crate::config::ecology::PenguinParams;
use crate::error::SimError;
use crate::simulation::movement::{chase_or_home, escape, random_move, EscapeRoute};
use crate::simulation::selection::nearest_weighted;
use crate::world::{AgentId, Terrain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PenguinStatus {
    Hunt,
    Full,
    Dead,
}

impl From<PenguinStatus> for Status {
    fn from(s: PenguinStatus) -> Status {
        match s {
            PenguinStatus::Hunt => Status::Hunt,
            PenguinStatus::Full => Status::Full,
            PenguinStatus::Dead => Status::Dead,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Penguin {
    pub status: PenguinStatus,
    pub energy: i32,
    /// Sprinting at run speed; cleared when energy runs out.
    pub full_speed: bool,
}

impl Penguin {
    pub fn new(energy: i32) -> Self {
        Penguin {
            status: PenguinStatus::Hunt,
            energy,
            full_speed: true,
        }
    }

    /// Starting energy ~ Normal(max, max / 2), truncated and kept inside [0, max].
    pub fn spawn<R: Rng + ?Sized>(params: &PenguinParams, rng: &mut R) -> Self {
        let max = params.energy;
        let energy = match Normal::new(max as f64, max as f64 / 2.0) {
            Ok(dist) => (dist.sample(rng).trunc() as i32).clamp(0, max.max(0)),
            Err(_) => max,
        };
        Self::new(energy)
    }

    /// Pursuit speed for this tick, spending or recovering one unit of energy.
    ///
    /// Sprints at `run` until energy reaches 0, then walks at `walk` while
    /// recovering until energy is back at exactly `max`.
    pub fn energy_level(&mut self, max: i32, run: f64, walk: f64) -> f64 {
        if self.energy == max {
            self.full_speed = true;
        }
        if self.energy == 0 {
            self.full_speed = false;
        }

        if self.full_speed {
            self.energy = (self.energy - 1).max(0);
            run
        } else {
            self.energy += 1;
            walk
        }
    }
}

fn penguin_mut<'a>(behavior: &'a mut Behavior) -> Option<&'a mut Penguin> {
    match behavior {
        Behavior::Penguin(p) => Some(p),
        _ => None,
    }
}

/// Flee seals towards land, walk home once fed, otherwise hunt live fish.
pub fn step<R: Rng + ?Sized>(
    id: AgentId,
    ctx: &mut StepContext<'_, R>,
) -> Result<Option<Catch>, SimError> {
    let agent = ctx.agents[id];
    let Behavior::Penguin(penguin) = agent.behavior else {
        return Ok(None);
    };
    if penguin.status == PenguinStatus::Dead {
        return Ok(None);
    }

    let eco = ctx.params;
    let params = &eco.penguin;
    let weights = &eco.selection_weights;

    let seals = ctx.nearby_positions(id, params.escape_alert, |a| a.species() == Species::Seal)?;
    if !seals.is_empty() {
        let to = escape(
            ctx.world,
            agent.position,
            &seals,
            params.run_speed,
            EscapeRoute::Refuge(Terrain::Land),
            weights,
            ctx.rng,
        )?;
        ctx.move_agent(id, to)?;
        return Ok(None);
    }

    if penguin.status == PenguinStatus::Full {
        let to = chase_or_home(
            ctx.world,
            agent.position,
            agent.home,
            params.walk_speed,
            None,
            weights,
            ctx.rng,
        )?;
        ctx.move_agent(id, to)?;
        // Homing recovers energy without an upper bound.
        if let Some(p) = penguin_mut(&mut ctx.agents[id].behavior) {
            p.energy = p.energy.saturating_add(1);
        }
        return Ok(None);
    }

    let fish = ctx.nearby_positions(id, params.hunt_alert, |a| {
        a.species() == Species::Fish && a.status() == Status::Alive
    })?;
    if fish.is_empty() {
        let to = random_move(ctx.world, agent.position, params.wander_speed, None, ctx.rng)?;
        ctx.move_agent(id, to)?;
        return Ok(None);
    }

    let target = nearest_weighted(&fish, agent.position, weights, ctx.rng)?;
    let speed = match penguin_mut(&mut ctx.agents[id].behavior) {
        Some(p) => p.energy_level(params.energy, params.run_speed, params.walk_speed),
        None => params.walk_speed,
    };
    let to = chase_or_home(ctx.world, agent.position, target, speed, None, weights, ctx.rng)?;

    let caught = ctx.pounce(id, to, Species::Fish)?;
    if caught.is_some() {
        if let Some(p) = penguin_mut(&mut ctx.agents[id].behavior) {
            p.status = PenguinStatus::Full;
        }
    }
    Ok(caught)
}
