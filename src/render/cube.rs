//! Face-by-face cube rendering.
//!
//! Draws one bandaged cube of any order as a vector image: six face grids
//! placed by the projection's transform chains, separator lines where
//! bandage groups end, and an optional caption. The output is a pure
//! function of the inputs, so independent cubes can be rendered in any
//! order and identical calls can be cached.

use std::path::Path;

use crate::cube::{Cube, Face};
use crate::error::Result;
use crate::render::projection::Projection;
use crate::render::style::{ColorMode, Palette};
use crate::render::svg::{num, Document, Element, Group, Line, Rect, Text};

pub struct CubeRenderer<'a> {
    pub projection: &'a Projection,
    pub palette: &'a Palette,
}

impl CubeRenderer<'_> {
    /// Render one cube at the given canvas size.
    pub fn render(
        &self,
        cube: &Cube,
        canvas_size: f64,
        mode: ColorMode,
        label: Option<&str>,
    ) -> Document {
        let order = cube.order();
        let n = order as f64;
        let stroke_width = 0.05 * n;

        let mut faces_group = Group {
            transform: format!(
                "scale({}) translate({})",
                num(canvas_size),
                num(stroke_width * 0.25 / n)
            ),
            children: Vec::with_capacity(6),
        };

        for face in Face::ALL {
            faces_group
                .children
                .push(Element::Group(self.render_face(cube, face, mode, stroke_width)));
        }

        let mut elements = vec![Element::Group(faces_group)];

        if let Some(text) = label {
            let spec = self.projection.label;
            elements.push(Element::Text(Text {
                content: text.to_string(),
                x: canvas_size * spec.pos_x,
                y: canvas_size * spec.pos_y,
                font_size: canvas_size * spec.size,
                anchor: spec.anchor,
            }));
        }

        Document {
            width: canvas_size * self.projection.width_multiplier,
            height: canvas_size * self.projection.height_multiplier,
            elements,
        }
    }

    /// Render and write in one step.
    pub fn render_to_file(
        &self,
        cube: &Cube,
        canvas_size: f64,
        mode: ColorMode,
        label: Option<&str>,
        path: &Path,
    ) -> Result<()> {
        self.render(cube, canvas_size, mode, label).write_to(path)?;
        Ok(())
    }

    fn render_face(
        &self,
        cube: &Cube,
        face: Face,
        mode: ColorMode,
        stroke_width: f64,
    ) -> Group {
        let order = cube.order();
        let n = order as f64;
        let grid = cube.face(face);
        let color = self.palette.face_color(face);

        let mut group = Group {
            transform: format!(
                "{} scale({})",
                self.projection.face_transform(face),
                num(1.0 / n)
            ),
            children: Vec::new(),
        };

        if mode == ColorMode::Full {
            group.children.push(Element::Rect(Rect {
                x: 0.0,
                y: 0.0,
                width: n,
                height: n,
                fill: color.to_string(),
                stroke: color.to_string(),
                stroke_width: stroke_width / 2.0,
            }));
        }

        // Center-group coloring only exists on odd orders, where the grid
        // has an exact center cell.
        if mode == ColorMode::Center && order % 2 == 1 {
            let center = (order - 1) / 2;
            let center_label = grid[center][center];
            for (y, row) in grid.iter().enumerate() {
                for (x, &cell) in row.iter().enumerate() {
                    if (center_label != 0 && cell == center_label)
                        || (x == center && y == center)
                    {
                        group.children.push(Element::Rect(Rect {
                            x: x as f64,
                            y: y as f64,
                            width: 1.0,
                            height: 1.0,
                            fill: color.to_string(),
                            stroke: color.to_string(),
                            stroke_width: stroke_width / 2.0,
                        }));
                    }
                }
            }
        }

        // Separators between cells that are not fused together. An
        // unbandaged cell always shows its seams.
        for y in 0..order {
            for x in 0..order {
                if x + 1 < order && (grid[y][x + 1] == 0 || grid[y][x + 1] != grid[y][x]) {
                    group.children.push(Element::Line(Line {
                        x1: (x + 1) as f64,
                        y1: y as f64,
                        x2: (x + 1) as f64,
                        y2: (y + 1) as f64,
                        stroke: "black".to_string(),
                        stroke_width,
                    }));
                }
                if y + 1 < order && (grid[y + 1][x] == 0 || grid[y + 1][x] != grid[y][x]) {
                    group.children.push(Element::Line(Line {
                        x1: x as f64,
                        y1: (y + 1) as f64,
                        x2: (x + 1) as f64,
                        y2: (y + 1) as f64,
                        stroke: "black".to_string(),
                        stroke_width,
                    }));
                }
            }
        }

        group.children.push(Element::Rect(Rect {
            x: 0.0,
            y: 0.0,
            width: n,
            height: n,
            fill: "none".to_string(),
            stroke: "black".to_string(),
            stroke_width: stroke_width * 1.5,
        }));

        group
    }
}
