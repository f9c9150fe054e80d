//! Configuration loading.
//!
//! Configuration is loaded from TOML files with environment variable
//! overrides. Every value that used to be a mutable global in the original
//! tool (tier capacities, edge thresholds, face colors, layout settings,
//! legend limits) is an immutable field here and is passed explicitly into
//! the pipeline.

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::render::style::Palette;
use crate::render::tiers::Tier;

pub const DEFAULT_CONFIG_FILE: &str = "bandagraph.default.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GrapherConfig {
    #[serde(default)]
    pub tiers: TiersConfig,

    #[serde(default)]
    pub edges: EdgesConfig,

    #[serde(default)]
    pub legend: LegendConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub explorer: ExplorerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub palette: Palette,
}

/// Maximum node counts per rendering tier.
#[derive(Debug, Clone, Deserialize)]
pub struct TiersConfig {
    #[serde(default = "default_cube_nodes")]
    pub cube: usize,

    #[serde(default = "default_circle_with_label_nodes")]
    pub circle_with_label: usize,

    #[serde(default = "default_label_only_nodes")]
    pub label_only: usize,

    #[serde(default = "default_circle_nodes")]
    pub circle: usize,
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            cube: default_cube_nodes(),
            circle_with_label: default_circle_with_label_nodes(),
            label_only: default_label_only_nodes(),
            circle: default_circle_nodes(),
        }
    }
}

impl TiersConfig {
    /// The capacity budgets in tier priority order.
    pub fn budgets(&self) -> Vec<(Tier, usize)> {
        vec![
            (Tier::Cube, self.cube),
            (Tier::CircleWithLabel, self.circle_with_label),
            (Tier::LabelOnly, self.label_only),
            (Tier::Circle, self.circle),
        ]
    }
}

fn default_cube_nodes() -> usize {
    10
}

fn default_circle_with_label_nodes() -> usize {
    50
}

fn default_label_only_nodes() -> usize {
    0
}

fn default_circle_nodes() -> usize {
    2500
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgesConfig {
    #[serde(default = "default_show_labels_max")]
    pub show_labels_max: usize,

    #[serde(default = "default_show_arrows_max")]
    pub show_arrows_max: usize,
}

impl Default for EdgesConfig {
    fn default() -> Self {
        Self {
            show_labels_max: default_show_labels_max(),
            show_arrows_max: default_show_arrows_max(),
        }
    }
}

fn default_show_labels_max() -> usize {
    300
}

fn default_show_arrows_max() -> usize {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegendConfig {
    #[serde(default = "default_index_rows")]
    pub index_rows: usize,

    #[serde(default = "default_max_index_size")]
    pub max_index_size: usize,

    /// Node count past which an enabled legend is likely to produce an
    /// empty image in the external rasterizer.
    #[serde(default = "default_large_graph_nodes")]
    pub large_graph_nodes: usize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            index_rows: default_index_rows(),
            max_index_size: default_max_index_size(),
            large_graph_nodes: default_large_graph_nodes(),
        }
    }
}

fn default_index_rows() -> usize {
    8
}

fn default_max_index_size() -> usize {
    200
}

fn default_large_graph_nodes() -> usize {
    10000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Layout engine executable.
    #[serde(default = "default_layout_command")]
    pub command: String,

    /// Layout algorithm for the main graph.
    #[serde(default = "default_layout_algorithm")]
    pub algorithm: String,

    #[serde(default = "default_graph_dpi")]
    pub graph_dpi: u32,

    #[serde(default = "default_legend_dpi")]
    pub legend_dpi: u32,

    #[serde(default = "default_compose_dpi")]
    pub compose_dpi: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            command: default_layout_command(),
            algorithm: default_layout_algorithm(),
            graph_dpi: default_graph_dpi(),
            legend_dpi: default_legend_dpi(),
            compose_dpi: default_compose_dpi(),
        }
    }
}

fn default_layout_command() -> String {
    "dot".to_string()
}

fn default_layout_algorithm() -> String {
    "sfdp".to_string()
}

fn default_graph_dpi() -> u32 {
    100
}

fn default_legend_dpi() -> u32 {
    50
}

fn default_compose_dpi() -> u32 {
    200
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExplorerConfig {
    /// External explorer command line; required for any rendering run.
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,

    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            format: default_format(),
        }
    }
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_format() -> String {
    "png".to_string()
}

impl GrapherConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("BANDAGRAPH").separator("__"))
            .build()?;

        let grapher_config: GrapherConfig = config.try_deserialize().unwrap_or_default();
        Ok(grapher_config)
    }
}
