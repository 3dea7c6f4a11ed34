pub mod ecology;
pub mod simulation;
