//! Face placement for the two cube projections.
//!
//! A projection places each of the six unit faces onto the canvas with a
//! fixed chain of affine operations and carries the label placement and
//! canvas size multipliers. The values are immutable configuration, passed
//! explicitly into the renderer.

use crate::cube::Face;
use crate::render::svg::num;

/// One affine operation in a face transform chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// Uniform scale.
    Scale(f64),
    /// Anisotropic scale.
    ScaleXy(f64, f64),
    Translate(f64, f64),
    /// Rotation in degrees around the origin.
    Rotate(f64),
    /// Rotation in degrees around a fixed point.
    RotateAbout(f64, f64, f64),
}

impl TransformOp {
    fn write(self, out: &mut String) {
        match self {
            TransformOp::Scale(s) => out.push_str(&format!("scale({})", num(s))),
            TransformOp::ScaleXy(x, y) => out.push_str(&format!("scale({},{})", num(x), num(y))),
            TransformOp::Translate(x, y) => {
                out.push_str(&format!("translate({},{})", num(x), num(y)))
            }
            TransformOp::Rotate(a) => out.push_str(&format!("rotate({})", num(a))),
            TransformOp::RotateAbout(a, cx, cy) => {
                out.push_str(&format!("rotate({},{},{})", num(a), num(cx), num(cy)))
            }
        }
    }
}

/// Label placement metadata, in canvas-size units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSpec {
    pub pos_x: f64,
    pub pos_y: f64,
    pub size: f64,
    pub anchor: &'static str,
}

/// A named, immutable cube projection.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub name: &'static str,
    face_ops: [&'static [TransformOp]; 6],
    pub label: LabelSpec,
    pub width_multiplier: f64,
    pub height_multiplier: f64,
}

impl Projection {
    /// The SVG transform chain placing one face.
    pub fn face_transform(&self, face: Face) -> String {
        let mut out = String::new();
        for (i, op) in self.face_ops[face.index()].iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            op.write(&mut out);
        }
        out
    }
}

use TransformOp::{Rotate, RotateAbout, Scale, ScaleXy, Translate};

/// Unfolded cross layout: L F R B in a middle row, U above and D below F.
pub static CUBE_MAP: Projection = Projection {
    name: "cube_map",
    face_ops: [
        &[Scale(0.25), Translate(0.0, 1.0)],
        &[Scale(0.25), Translate(1.0, 1.0)],
        &[Scale(0.25), Translate(2.0, 1.0)],
        &[Scale(0.25), Translate(3.0, 1.0)],
        &[Scale(0.25), Translate(1.0, 0.0)],
        &[Scale(0.25), Translate(1.0, 2.0)],
    ],
    label: LabelSpec {
        pos_x: 1.0,
        pos_y: 0.75,
        size: 0.17,
        anchor: "end",
    },
    width_multiplier: 1.0,
    height_multiplier: 0.75,
};

/// Two isometric corner views side by side: U/L/F on the left, D/R/B
/// mirrored on the right.
pub static ISOMETRIC: Projection = Projection {
    name: "isometric",
    face_ops: [
        &[
            Scale(0.3),
            Translate(0.8, 0.82),
            Rotate(60.0),
            ScaleXy(1.0, 0.58),
            Rotate(45.0),
            RotateAbout(-90.0, 0.5, 0.5),
        ],
        &[
            Scale(0.3),
            Translate(0.8, 0.82),
            Rotate(-60.0),
            ScaleXy(1.0, 0.58),
            Rotate(45.0),
        ],
        &[
            Scale(0.3),
            Translate(2.41, 0.82),
            Rotate(120.0),
            ScaleXy(1.0, 0.58),
            Rotate(45.0),
            RotateAbout(180.0, 0.5, 0.5),
        ],
        &[
            Scale(0.3),
            Translate(2.41, 0.82),
            Rotate(-120.0),
            ScaleXy(1.0, 0.58),
            Rotate(45.0),
            RotateAbout(90.0, 0.5, 0.5),
        ],
        &[
            Scale(0.3),
            Translate(0.8, 0.0),
            ScaleXy(1.0, 0.58),
            Rotate(45.0),
            RotateAbout(-90.0, 0.5, 0.5),
        ],
        &[
            Scale(0.3),
            Translate(2.41, 0.82),
            ScaleXy(1.0, 0.58),
            Rotate(45.0),
            RotateAbout(180.0, 0.5, 0.5),
        ],
    ],
    label: LabelSpec {
        pos_x: 0.5,
        pos_y: 0.63,
        size: 0.17,
        anchor: "middle",
    },
    width_multiplier: 1.0,
    height_multiplier: 0.65,
};
