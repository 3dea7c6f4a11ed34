use crate::world::Position;

/// Precondition violations raised by the simulation core.
///
/// Both variants indicate a caller bug and propagate up to `Simulation::tick`.
/// Fallbacks such as "no cell of the requested terrain" are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    OutOfBounds { position: Position, map_size: i32 },
    EmptyCandidateSet { policy: &'static str },
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::OutOfBounds { position, map_size } => write!(
                f,
                "Position ({}, {}) outside {}x{} grid",
                position.x, position.y, map_size, map_size
            ),
            SimError::EmptyCandidateSet { policy } => {
                write!(f, "{} called with no candidate positions", policy)
            }
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_names_position() {
        let err = SimError::OutOfBounds {
            position: Position::new(-1, 7),
            map_size: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("(-1, 7)"));
        assert!(msg.contains("20x20"));
    }

    #[test]
    fn empty_candidates_message_names_policy() {
        let err = SimError::EmptyCandidateSet {
            policy: "nearest_weighted",
        };
        assert!(err.to_string().contains("nearest_weighted"));
    }
}
