//! Bandagraph - bandaged cube state graphs as vector art.
//!
//! Decodes compact connectivity signatures of bandaged cube puzzles into
//! labeled cubie arrays and draws the graph of reachable states, with a
//! legend and per-node cube thumbnails, through an external layout
//! engine.

pub mod batch;
pub mod compose;
pub mod config;
pub mod cube;
pub mod dot;
pub mod error;
pub mod explore;
pub mod layout;
pub mod render;
pub mod signature;

pub use config::GrapherConfig;
pub use cube::{Cube, Face};
pub use error::{GrapherError, Result};
pub use explore::{Exploration, ExplorationOracle};
