//! Vector rendering: cube images, node tiers, edge styles.

pub mod cube;
pub mod edges;
pub mod projection;
pub mod style;
pub mod svg;
pub mod tiers;

pub use cube::CubeRenderer;
pub use projection::{Projection, CUBE_MAP, ISOMETRIC};
pub use style::{ColorMode, Palette};
pub use tiers::{categorize, Tier, TierAssignment};
