//! Volumetric cube state.
//!
//! A bandaged cube is a flat array of N³ group labels. Label 0 marks an
//! unbandaged cubie; cubies sharing a positive label are fused into one
//! block. Axis 0 runs top to bottom (U at 0, D at the end), axis 1 back to
//! front (B at 0, F at the end), axis 2 left to right (L at 0, R at the
//! end).

use crate::error::{GrapherError, Result};

/// One of the six cube faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Left,
    Front,
    Right,
    Back,
    Up,
    Down,
}

impl Face {
    /// All faces in the fixed drawing order.
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Up,
        Face::Down,
    ];

    /// The single-letter move name for this face.
    pub fn letter(self) -> char {
        match self {
            Face::Left => 'L',
            Face::Front => 'F',
            Face::Right => 'R',
            Face::Back => 'B',
            Face::Up => 'U',
            Face::Down => 'D',
        }
    }

    /// Stable index into per-face tables.
    pub fn index(self) -> usize {
        match self {
            Face::Left => 0,
            Face::Front => 1,
            Face::Right => 2,
            Face::Back => 3,
            Face::Up => 4,
            Face::Down => 5,
        }
    }

    /// Parse a single-letter move name.
    pub fn from_letter(c: char) -> Option<Face> {
        match c {
            'L' => Some(Face::Left),
            'F' => Some(Face::Front),
            'R' => Some(Face::Right),
            'B' => Some(Face::Back),
            'U' => Some(Face::Up),
            'D' => Some(Face::Down),
            _ => None,
        }
    }
}

/// A labeled NxNxN bandaged cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cube {
    order: usize,
    cells: Vec<u32>,
}

impl Cube {
    /// Build a cube from a flat label array of length `order³`.
    pub fn new(order: usize, cells: Vec<u32>) -> Result<Self> {
        if order == 0 || cells.len() != order * order * order {
            return Err(GrapherError::InvalidSignature {
                signature: format!("{cells:?}"),
                reason: "cubie count does not match the cube order",
            });
        }
        Ok(Self { order, cells })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Label at volumetric position (axis 0, axis 1, axis 2).
    pub fn at(&self, a: usize, b: usize, c: usize) -> u32 {
        let n = self.order;
        self.cells[a * n * n + b * n + c]
    }

    /// Extract one face as a row-major grid (`grid[row][col]`).
    ///
    /// The slicing and reversal rules per face are fixed so that adjacent
    /// grid cells are physically adjacent cubies on the unfolded net.
    pub fn face(&self, face: Face) -> Vec<Vec<u32>> {
        let n = self.order;
        let cell = |i: usize, j: usize| match face {
            Face::Left => self.at(i, j, 0),
            Face::Front => self.at(i, n - 1, j),
            Face::Right => self.at(i, n - 1 - j, n - 1),
            Face::Back => self.at(i, 0, n - 1 - j),
            Face::Up => self.at(0, i, j),
            Face::Down => self.at(n - 1, n - 1 - i, j),
        };
        (0..n)
            .map(|i| (0..n).map(|j| cell(i, j)).collect())
            .collect()
    }
}
