//! Edge styling for the state graph.
//!
//! Each directed edge carries one or more concatenated face-move letters.
//! Single-letter labels take the face color; composite labels get a fixed
//! fallback color and are displayed as a `*` wildcard. Labels and
//! arrowheads are suppressed independently once the graph grows past the
//! configured scale thresholds.

use std::collections::HashMap;

use crate::render::style::Palette;

/// Wildcard glyph shown for composite move labels.
pub const WILDCARD_LABEL: &str = "*";

/// Derived visual attributes for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub color: String,
    /// Display label; `None` when labels are suppressed.
    pub label: Option<String>,
    pub arrowhead: bool,
    pub font_size: u32,
    pub arrow_size: f64,
}

/// Scale thresholds controlling label and arrow visibility.
#[derive(Debug, Clone, Copy)]
pub struct EdgeThresholds {
    /// Labels are shown while the edge count stays at or below this.
    pub show_labels_max: usize,
    /// Arrowheads are shown while the edge count stays below this.
    pub show_arrows_max: usize,
}

/// Style one edge label under the given visibility switches.
pub fn style_label(label: &str, palette: &Palette, show_labels: bool, show_arrows: bool) -> EdgeStyle {
    let known = palette.move_color(label);
    let color = known.unwrap_or(&palette.unknown_move).to_string();
    let label = show_labels.then(|| {
        if known.is_some() {
            label.to_string()
        } else {
            WILDCARD_LABEL.to_string()
        }
    });
    EdgeStyle {
        color,
        label,
        arrowhead: show_arrows,
        font_size: 16,
        arrow_size: 1.0,
    }
}

/// Style every labeled edge of a graph with `edge_count` edges total.
pub fn style_edges(
    labels: &HashMap<(u32, u32), String>,
    edge_count: usize,
    palette: &Palette,
    thresholds: EdgeThresholds,
) -> HashMap<(u32, u32), EdgeStyle> {
    let show_labels = edge_count <= thresholds.show_labels_max;
    let show_arrows = edge_count < thresholds.show_arrows_max;
    labels
        .iter()
        .map(|(&edge, label)| (edge, style_label(label, palette, show_labels, show_arrows)))
        .collect()
}
