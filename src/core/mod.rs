pub mod ecs;
pub mod game;
pub mod serialization;
