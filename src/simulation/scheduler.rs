use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::AgentId;

/// Registry of scheduled agents, activated in a fresh random order every tick.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    registered: Vec<AgentId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: AgentId) {
        self.registered.push(id);
    }

    pub fn registered(&self) -> &[AgentId] {
        &self.registered
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Uniform permutation of every registered agent.
    pub fn activation_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<AgentId> {
        let mut order = self.registered.clone();
        order.shuffle(rng);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn order_is_a_permutation() {
        let mut scheduler = Scheduler::new();
        for id in 0..50 {
            scheduler.add(id);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut order = scheduler.activation_order(&mut rng);
        order.sort();
        assert_eq!(order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn order_changes_between_ticks() {
        let mut scheduler = Scheduler::new();
        for id in 0..20 {
            scheduler.add(id);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let first = scheduler.activation_order(&mut rng);
        let differs = (0..5).any(|_| scheduler.activation_order(&mut rng) != first);
        assert!(differs);
        assert_eq!(scheduler.registered(), (0..20).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn same_seed_same_order() {
        let mut scheduler = Scheduler::new();
        for id in 0..30 {
            scheduler.add(id);
        }
        let a = scheduler.activation_order(&mut ChaCha8Rng::seed_from_u64(9));
        let b = scheduler.activation_order(&mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_scheduler_yields_empty_order() {
        let scheduler = Scheduler::new();
        assert!(scheduler.is_empty());
        assert!(scheduler
            .activation_order(&mut ChaCha8Rng::seed_from_u64(0))
            .is_empty());
    }
}
