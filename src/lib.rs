// Procedural starfield backdrop built from a fixed chain of full-screen
// passes over a ping/pong pair of offscreen targets.
//
// The composer (`starfield::Starfield`) regenerates only when the
// drawable size changes and blits its cached image every frame. All
// randomness flows from one seeded `random::Random`, so a seed and a
// size always give the same picture.

pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod fx;
pub mod pingpong;
pub mod random;
pub mod shaders;
pub mod soft;
pub mod starfield;
pub mod stats;
pub mod types;

pub use context::DrawContext;
pub use error::Error;
pub use random::{Random, SharedRandom};
pub use soft::SoftContext;
pub use starfield::{CacheState, Starfield};
pub use types::{Size, Target};
