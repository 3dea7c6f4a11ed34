pub mod movement;
pub mod scheduler;
pub mod selection;
pub mod statistics;

use std::collections::HashMap;
use std::time::Instant;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::spawn::sample_home;
use crate::agent::{
    self, Agent, AgentSnapshot, Behavior, Catch, Fish, Penguin, Seal, Species, StepContext,
};
use crate::config::ecology::EcologyParams;
use crate::config::simulation::SimulationConfig;
pub use crate::config::simulation::StopRule;
use crate::error::SimError;
use crate::simulation::scheduler::Scheduler;
use crate::simulation::statistics::{compute_statistics, PopulationStatistics};
use crate::world::{AgentId, Position, Terrain, World};

/// Ticks between progress log lines.
const MILESTONE_TICKS: u64 = 50;

/// Result of executing a single tick.
#[derive(Debug)]
pub struct TickResult {
    pub statistics: PopulationStatistics,
    pub catches: Vec<Catch>,
}

/// Outcome of seeding the initial population.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub placed: HashMap<Species, u32>,
    /// Agents whose home search ran out of retries and were left out.
    pub exhausted: HashMap<Species, u32>,
}

impl SpawnReport {
    pub fn placed(&self, species: Species) -> u32 {
        self.placed.get(&species).copied().unwrap_or(0)
    }

    pub fn exhausted(&self, species: Species) -> u32 {
        self.exhausted.get(&species).copied().unwrap_or(0)
    }
}

/// Owns the grid, the population and the schedule of one run.
#[derive(Debug, Clone)]
pub struct Simulation {
    run_id: Uuid,
    seed: u64,
    params: EcologyParams,
    world: World,
    agents: Vec<Agent>,
    scheduler: Scheduler,
    rng: ChaCha8Rng,
    next_species_id: HashMap<Species, u32>,
    spawn_report: SpawnReport,
    tick_count: u64,
    total_ticks: u64,
    stop_rule: StopRule,
    running: bool,
}

impl Simulation {
    /// Build the terrain and seed fish, then penguins, then seals.
    ///
    /// A `seed` of 0 draws a random seed; the one actually used is kept in
    /// `seed()` for reproducibility.
    pub fn new(params: &EcologyParams, config: &SimulationConfig) -> Result<Self, SimError> {
        let seed = if config.seed == 0 {
            rand::thread_rng().r#gen()
        } else {
            config.seed
        };
        let mut sim = Self::bare(params, seed, config.total_ticks, config.stop_rule);
        sim.populate()?;
        Ok(sim)
    }

    /// A run with terrain but no agents; add them with `add_agent`.
    pub fn bare(params: &EcologyParams, seed: u64, total_ticks: u64, stop_rule: StopRule) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let run_id = Uuid::from_bytes(rng.r#gen());
        Self {
            run_id,
            seed,
            params: params.clone(),
            world: World::new(params.map_size, &params.land),
            agents: Vec::new(),
            scheduler: Scheduler::new(),
            rng,
            next_species_id: HashMap::new(),
            spawn_report: SpawnReport::default(),
            tick_count: 0,
            total_ticks,
            stop_rule,
            running: total_ticks > 0,
        }
    }

    fn take_species_id(&mut self, species: Species) -> u32 {
        let next = self.next_species_id.entry(species).or_insert(0);
        let id = *next;
        *next += 1;
        id
    }

    /// Place a new agent on `home` and schedule it. Terrain is not checked.
    pub fn add_agent(&mut self, species: Species, home: Position) -> Result<AgentId, SimError> {
        let species_id = self.take_species_id(species);
        self.insert_agent(species, species_id, home)
    }

    fn insert_agent(
        &mut self,
        species: Species,
        species_id: u32,
        home: Position,
    ) -> Result<AgentId, SimError> {
        let behavior = match species {
            Species::Fish => Behavior::Fish(Fish::new()),
            Species::Penguin => Behavior::Penguin(Penguin::spawn(&self.params.penguin, &mut self.rng)),
            Species::Seal => Behavior::Seal(Seal::new()),
        };
        let id = self.agents.len();
        self.world.index.place(id, home)?;
        self.agents.push(Agent {
            id: species_id,
            position: home,
            home,
            behavior,
        });
        self.scheduler.add(id);
        *self.spawn_report.placed.entry(species).or_insert(0) += 1;
        Ok(id)
    }

    fn populate(&mut self) -> Result<(), SimError> {
        let params = self.params.clone();
        let plan = [
            (Species::Fish, params.population.fish, &params.fish.spawn, Terrain::Water),
            (Species::Penguin, params.population.penguin, &params.penguin.spawn, Terrain::Land),
            (Species::Seal, params.population.seal, &params.seal.spawn, Terrain::Water),
        ];

        for (species, count, spawn, terrain) in plan {
            let sigma = spawn.sigma_for(params.map_size);
            for _ in 0..count {
                let species_id = self.take_species_id(species);
                match sample_home(
                    spawn.mean,
                    sigma,
                    &self.world.terrain,
                    terrain,
                    spawn.max_retries,
                    &mut self.rng,
                ) {
                    Some(home) => {
                        self.insert_agent(species, species_id, home)?;
                    }
                    None => {
                        *self.spawn_report.exhausted.entry(species).or_insert(0) += 1;
                    }
                }
            }

            let exhausted = self.spawn_report.exhausted(species);
            if exhausted > 0 {
                warn!(
                    species = species.name(),
                    exhausted,
                    requested = count,
                    "Home search exhausted; agents left out"
                );
            }
        }

        info!(
            seed = self.seed,
            fish = self.spawn_report.placed(Species::Fish),
            penguins = self.spawn_report.placed(Species::Penguin),
            seals = self.spawn_report.placed(Species::Seal),
            "Population seeded"
        );
        Ok(())
    }

    /// Run one agent's step outside of a tick.
    pub fn step_agent(&mut self, id: AgentId) -> Result<Option<Catch>, SimError> {
        if id >= self.agents.len() {
            return Ok(None);
        }
        let mut ctx = StepContext {
            world: &mut self.world,
            agents: &mut self.agents,
            params: &self.params,
            rng: &mut self.rng,
        };
        agent::step(id, &mut ctx)
    }

    /// Advance one tick with a freshly shuffled activation order.
    pub fn tick(&mut self) -> Result<TickResult, SimError> {
        let order = self.scheduler.activation_order(&mut self.rng);
        self.tick_with_order(&order)
    }

    /// Advance one tick activating agents in exactly `order`.
    ///
    /// Each step runs to completion before the next starts and sees every
    /// move and kill made earlier in the tick. An agent acts at most once per
    /// tick: repeated ids and ids outside the population are skipped.
    pub fn tick_with_order(&mut self, order: &[AgentId]) -> Result<TickResult, SimError> {
        let tick_start = Instant::now();
        let mut catches = Vec::new();
        let mut acted = vec![false; self.agents.len()];

        for &id in order {
            match acted.get_mut(id) {
                Some(done) if !*done => *done = true,
                _ => continue,
            }
            if let Some(catch) = self.step_agent(id)? {
                catches.push(catch);
            }
        }

        self.tick_count += 1;

        let tick_duration = tick_start.elapsed().as_secs_f32() * 1000.0;
        let statistics = compute_statistics(
            self.tick_count,
            &self.agents,
            catches.len() as u32,
            tick_duration,
        );

        if self.tick_count % MILESTONE_TICKS == 0 {
            info!(
                tick = self.tick_count,
                fish = statistics.live(Species::Fish),
                penguins = statistics.live(Species::Penguin),
                seals = statistics.live(Species::Seal),
                "Tick milestone"
            );
        }

        self.update_running(&statistics);

        Ok(TickResult {
            statistics,
            catches,
        })
    }

    fn update_running(&mut self, statistics: &PopulationStatistics) {
        if !self.running {
            return;
        }
        let stop = match self.stop_rule {
            StopRule::LivePenguins => statistics.live(Species::Penguin) == 0,
            StopRule::RegisteredPenguins => statistics.registered(Species::Penguin) == 0,
            StopRule::Never => false,
        };
        if stop {
            info!(tick = self.tick_count, rule = ?self.stop_rule, "Stop rule triggered");
            self.running = false;
        } else if self.tick_count >= self.total_ticks {
            self.running = false;
        }
    }

    /// Tick until the run stops, handing every result to `on_tick`.
    pub fn run<F>(&mut self, mut on_tick: F) -> Result<u64, SimError>
    where
        F: FnMut(&Simulation, &TickResult),
    {
        while self.running {
            let result = self.tick()?;
            on_tick(&*self, &result);
        }
        Ok(self.tick_count)
    }

    pub fn agents(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id]
    }

    #[cfg(test)]
    pub(crate) fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id]
    }

    pub fn population(&self) -> &[Agent] {
        &self.agents
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn params(&self) -> &EcologyParams {
        &self.params
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn spawn_report(&self) -> &SpawnReport {
        &self.spawn_report
    }

    pub fn scheduled(&self) -> &[AgentId] {
        self.scheduler.registered()
    }
}
