pub mod constants;
pub mod road_math;
pub mod sprites;
pub mod track;
pub mod traffic;
pub mod collisions;
pub mod physics;
pub mod lap_system;
pub mod world;
pub mod game_loop;

pub use constants::*;
pub use road_math::*;
pub use sprites::*;
pub use track::*;
pub use traffic::*;
pub use collisions::*;
pub use physics::*;
pub use lap_system::*;
pub use world::*;
pub use game_loop::*;
