//! DNA: a selfish-genes simulation of units that wander, eat, fight and
//! breed on a board, built on the Selfish Genes Engine.

pub mod game_loop;
pub mod resources;
pub mod scripts;
pub mod setup;

pub use game_loop::GameLoop;
pub use resources::{GameRng, Population};
pub use setup::{build_demo_scene, empty_scene, load_scene};
