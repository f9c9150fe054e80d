//! Face color scheme.
//!
//! The palette colors the cube faces and the face-move edges of the state
//! graph. It is loaded with the configuration and passed explicitly into
//! the renderers.

use serde::Deserialize;

use crate::cube::Face;

/// How face colors are applied when drawing a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Leave the cube white.
    White,
    /// Color the center cubie and every cubie fused to it, odd orders only.
    Center,
    /// Color the whole face.
    Full,
}

/// Face and edge colors.
#[derive(Debug, Clone, Deserialize)]
pub struct Palette {
    #[serde(default = "default_left")]
    pub left: String,
    #[serde(default = "default_front")]
    pub front: String,
    #[serde(default = "default_right")]
    pub right: String,
    #[serde(default = "default_back")]
    pub back: String,
    #[serde(default = "default_up")]
    pub up: String,
    #[serde(default = "default_down")]
    pub down: String,
    /// Edge color for composite move labels not in the face table.
    #[serde(default = "default_unknown_move")]
    pub unknown_move: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            left: default_left(),
            front: default_front(),
            right: default_right(),
            back: default_back(),
            up: default_up(),
            down: default_down(),
            unknown_move: default_unknown_move(),
        }
    }
}

fn default_left() -> String {
    "green".to_string()
}

fn default_front() -> String {
    "red".to_string()
}

fn default_right() -> String {
    "blue".to_string()
}

fn default_back() -> String {
    "orange".to_string()
}

fn default_up() -> String {
    "grey".to_string()
}

fn default_down() -> String {
    "#E0E000".to_string()
}

fn default_unknown_move() -> String {
    "#8020a0".to_string()
}

impl Palette {
    pub fn face_color(&self, face: Face) -> &str {
        match face {
            Face::Left => &self.left,
            Face::Front => &self.front,
            Face::Right => &self.right,
            Face::Back => &self.back,
            Face::Up => &self.up,
            Face::Down => &self.down,
        }
    }

    /// Color for an edge move label, if the label is a single face letter
    /// found verbatim in the table.
    pub fn move_color(&self, label: &str) -> Option<&str> {
        let mut chars = label.chars();
        let face = Face::from_letter(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(self.face_color(face))
    }
}
