//! Graph composition pipeline.
//!
//! Turns an explored move graph into the final image: categorize nodes
//! into rendering tiers, render cube thumbnails, style edges, lay out the
//! base graph through the external engine, and attach the legend.
//!
//! The legend is never embedded into the main layout. Very large SVG
//! sub-images make the external rasterizer fail silently with an empty
//! output once the document grows past an internal limit, so the base
//! graph and the legend are rendered to separate files first and then
//! composed as two sibling image nodes in a minimal wrapper graph.
//! Callers with very large graphs should skip the legend instead.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::config::GrapherConfig;
use crate::dot::{DotEdge, DotGraph, DotNode};
use crate::error::{GrapherError, Result};
use crate::explore::Exploration;
use crate::layout::LayoutEngine;
use crate::render::edges::{style_edges, EdgeThresholds};
use crate::render::projection::Projection;
use crate::render::style::ColorMode;
use crate::render::svg::num;
use crate::render::tiers::{categorize, Tier, TierAssignment};
use crate::render::CubeRenderer;

/// Base width of a circle-tier node; shrinks geometrically with rank.
const BASE_CIRCLE_WIDTH: f64 = 0.2;
/// Number of distinct circle size steps before the size bottoms out.
const MAX_CIRCLE_RANK: usize = 4;
/// Canvas size of a cube-tier thumbnail.
const NODE_IMAGE_SIZE: f64 = 100.0;
/// Canvas size of an index thumbnail; the start image is three times it.
const INDEX_IMAGE_SIZE: f64 = 80.0;

pub struct ComposeOptions<'a> {
    pub skip_legend: bool,
    /// Copy the temporary files and raw graph descriptions here before the
    /// scoped temp directory is released.
    pub keep_files: Option<&'a Path>,
}

pub struct GraphComposer<'a> {
    pub config: &'a GrapherConfig,
    pub projection: &'a Projection,
    pub engine: &'a dyn LayoutEngine,
}

impl GraphComposer<'_> {
    fn renderer(&self) -> CubeRenderer<'_> {
        CubeRenderer {
            projection: self.projection,
            palette: &self.config.palette,
        }
    }

    /// Draw the full graph image for one explored cube.
    pub fn draw(
        &self,
        exploration: &Exploration,
        signature: &str,
        caption: &str,
        output: &Path,
        opts: &ComposeOptions<'_>,
    ) -> Result<()> {
        let format = output
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("svg")
            .to_string();

        if !opts.skip_legend && exploration.nodes.len() > self.config.legend.large_graph_nodes {
            warn!(
                nodes = exploration.nodes.len(),
                "legend drawing on a graph this large is likely to produce an \
                 empty image; consider skipping the legend"
            );
        }

        // Scoped per-cube workspace, released on every exit path.
        let tmp = tempfile::Builder::new()
            .prefix("bandagraph_tmp")
            .tempdir()?;
        let prefix = tmp.path().join(signature);
        let prefix = prefix.to_string_lossy().into_owned();

        let assignment = self.categorize_nodes(exploration);
        let graph = self.build_graph(exploration, &assignment, &prefix, caption)?;

        let mut wrapper = None;
        if opts.skip_legend {
            self.engine.render(&graph, &format, output)?;
        } else {
            let graph_svg = format!("{prefix}_graph.svg");
            self.engine.render(&graph, "svg", Path::new(&graph_svg))?;

            let mut legend = self.build_legend(&format!("{prefix}_index_"), &assignment, exploration)?;
            legend.set_attr("layout", "dot");
            legend.set_attr("overlap", "false");
            legend.set_attr("dpi", self.config.layout.legend_dpi.to_string());
            let index_svg = format!("{prefix}_index.svg");
            self.engine.render(&legend, "svg", Path::new(&index_svg))?;

            let composed = self.compose_images(&graph_svg, &index_svg);
            self.engine.render(&composed, &format, output)?;
            wrapper = Some(composed);
        }

        if let Some(keep_dir) = opts.keep_files {
            self.preserve_files(tmp.path(), keep_dir, signature, &graph, wrapper.as_ref())?;
        }

        info!(signature, output = %output.display(), "graph written");
        Ok(())
    }

    /// Undirected degree per node of the directed edge set, then tier
    /// assignment under the configured budgets.
    fn categorize_nodes(&self, exploration: &Exploration) -> TierAssignment {
        let mut degrees: HashMap<u32, usize> = HashMap::new();
        for &(src, dst) in &exploration.edges {
            *degrees.entry(src).or_default() += 1;
            *degrees.entry(dst).or_default() += 1;
        }
        let mut node_degrees: Vec<(u32, usize)> = degrees.into_iter().collect();
        node_degrees.sort_unstable();
        categorize(&node_degrees, &self.config.tiers.budgets())
    }

    fn build_graph(
        &self,
        exploration: &Exploration,
        assignment: &TierAssignment,
        prefix: &str,
        caption: &str,
    ) -> Result<DotGraph> {
        let mut graph = DotGraph::new("cube_graph");
        graph.set_attr("overlap", "false");
        graph.set_attr("label", caption);
        graph.set_attr("labelloc", "top");
        graph.set_attr("dpi", self.config.layout.graph_dpi.to_string());
        graph.set_attr("layout", &self.config.layout.algorithm);

        let renderer = self.renderer();
        let circle_ranks = assignment.circle_ranks();

        for degree in assignment.degrees_desc() {
            for &id in assignment.nodes_with_degree(degree) {
                let node = DotNode::new(id.to_string());
                let node = match assignment.tier_of(degree) {
                    Tier::Cube => {
                        let mut node = node
                            .attr("shape", "none")
                            .attr("label", "")
                            .attr("height", "1")
                            .attr("width", "1");
                        if let Some(cube) = exploration.cubes.get(&id) {
                            let file = format!("{prefix}_node_{id}.svg");
                            renderer.render_to_file(
                                cube,
                                NODE_IMAGE_SIZE,
                                ColorMode::Center,
                                None,
                                Path::new(&file),
                            )?;
                            node = node.attr("image", file);
                        } else {
                            warn!(id, "no cube known for state, thumbnail skipped");
                        }
                        node
                    }
                    Tier::CircleWithLabel => node
                        .attr("fontsize", "20")
                        .attr("width", "0.5")
                        .attr("height", "0.5")
                        .attr("fixedsize", "true"),
                    Tier::LabelOnly => node
                        .attr("fontsize", "15")
                        .attr("width", "0.3")
                        .attr("height", "0.3")
                        .attr("penwidth", "0")
                        .attr("bgcolor", "transparent"),
                    Tier::Circle => {
                        let rank = circle_ranks.get(&degree).copied().unwrap_or(0);
                        let width =
                            BASE_CIRCLE_WIDTH * 0.5f64.powi(rank.min(MAX_CIRCLE_RANK) as i32);
                        node.attr("shape", "circle")
                            .attr("color", "black")
                            .attr("style", "filled")
                            .attr("label", "")
                            .attr("fixedsize", "true")
                            .attr("width", num(width))
                    }
                    Tier::Hidden => node
                        .attr("width", "0.03")
                        .attr("shape", "point")
                        .attr("color", "#00000080"),
                };
                graph.add_node(node);
            }
        }

        let thresholds = EdgeThresholds {
            show_labels_max: self.config.edges.show_labels_max,
            show_arrows_max: self.config.edges.show_arrows_max,
        };
        let styles = style_edges(
            &exploration.labels,
            exploration.edges.len(),
            &self.config.palette,
            thresholds,
        );
        for &(src, dst) in &exploration.edges {
            let mut edge = DotEdge::new(src.to_string(), dst.to_string());
            if let Some(style) = styles.get(&(src, dst)) {
                edge = edge
                    .attr("color", &style.color)
                    .attr("arrowsize", num(style.arrow_size))
                    .attr("fontcolor", &style.color)
                    .attr("fontsize", style.font_size.to_string());
                if let Some(label) = &style.label {
                    edge = edge.attr("label", label);
                }
                if !style.arrowhead {
                    edge = edge.attr("arrowhead", "none");
                }
            }
            graph.add_edge(edge);
        }

        // Synthetic zero-size pointer marking the entry state.
        graph.add_node(
            DotNode::new("start_pointer")
                .attr("label", "")
                .attr("shape", "point")
                .attr("height", "0")
                .attr("width", "0"),
        );
        graph.add_edge(
            DotEdge::new("start_pointer", "0")
                .attr("penwidth", "2")
                .attr("label", ""),
        );

        Ok(graph)
    }

    /// Build the legend: the start state at full size plus, when the
    /// labeled-circle tier is small enough, an index table of thumbnails.
    fn build_legend(
        &self,
        prefix: &str,
        assignment: &TierAssignment,
        exploration: &Exploration,
    ) -> Result<DotGraph> {
        let renderer = self.renderer();
        let mut legend = DotGraph::new("legend");
        let mut cluster = DotGraph::cluster("legend");
        cluster.set_attr("label", "");
        cluster.set_attr("fontsize", "16");
        cluster.set_attr("rankdir", "BT");

        let index_ids = assignment.nodes_in_tier(Tier::CircleWithLabel);
        let mut has_index = false;
        if !index_ids.is_empty() && index_ids.len() <= self.config.legend.max_index_size {
            let column_size = (index_ids.len() / self.config.legend.index_rows).max(1);
            let mut html = String::from("<table color='grey'>");
            for row in index_ids.chunks(column_size) {
                html.push_str(" <tr>");
                for &id in row {
                    let Some(cube) = exploration.cubes.get(&id) else {
                        warn!(id, "no cube known for state, index entry skipped");
                        continue;
                    };
                    let file = format!("{prefix}{id}.svg");
                    renderer.render_to_file(
                        cube,
                        INDEX_IMAGE_SIZE,
                        ColorMode::Center,
                        Some(&id.to_string()),
                        Path::new(&file),
                    )?;
                    html.push_str(&format!(" <td><img src='{file}'/></td>"));
                }
                html.push_str(" </tr>");
            }
            html.push_str(" </table>");

            cluster.add_node(
                DotNode::new("index")
                    .attr("shape", "none")
                    .attr_html("label", format!(" {html} "))
                    .attr("rank", "max"),
            );
            has_index = true;
        }

        let start_cube = exploration
            .cubes
            .get(&0)
            .ok_or_else(|| GrapherError::Explore("oracle returned no start state cube".into()))?;
        let start_file = format!("{prefix}start.svg");
        renderer.render_to_file(
            start_cube,
            INDEX_IMAGE_SIZE * 3.0,
            ColorMode::Full,
            None,
            Path::new(&start_file),
        )?;
        legend.add_node(
            DotNode::new("start")
                .attr("shape", "none")
                .attr("label", "")
                .attr("rank", "min")
                .attr("image", start_file),
        );
        legend.add_subgraph(cluster);
        if has_index {
            legend.add_edge(DotEdge::new("index", "start").attr("style", "invis"));
        }
        Ok(legend)
    }

    /// Wrap the separately rendered graph and legend images as two sibling
    /// embedded images.
    fn compose_images(&self, graph_svg: &str, index_svg: &str) -> DotGraph {
        let mut composed = DotGraph::new("composed");
        composed.set_attr("layout", "dot");
        composed.set_attr("rankdir", "LR");
        composed.set_attr("overlap", "false");
        composed.set_attr("dpi", self.config.layout.compose_dpi.to_string());
        composed.add_node(
            DotNode::new("graph_svg")
                .attr("shape", "none")
                .attr("label", "")
                .attr("labelloc", "top")
                .attr("rank", "max")
                .attr("image", graph_svg),
        );
        composed.add_node(
            DotNode::new("index_svg")
                .attr("shape", "none")
                .attr("label", "")
                .attr("rank", "min")
                .attr("image", index_svg),
        );
        composed.add_edge(DotEdge::new("graph_svg", "index_svg").attr("style", "invis"));
        composed
    }

    fn preserve_files(
        &self,
        tmp_dir: &Path,
        keep_dir: &Path,
        signature: &str,
        graph: &DotGraph,
        wrapper: Option<&DotGraph>,
    ) -> Result<()> {
        fs::create_dir_all(keep_dir)?;
        for entry in fs::read_dir(tmp_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::copy(entry.path(), keep_dir.join(entry.file_name()))?;
            }
        }
        graph.write_raw(&keep_dir.join(format!("{signature}_graph.dot")))?;
        if let Some(wrapper) = wrapper {
            wrapper.write_raw(&keep_dir.join(format!("{signature}_main.dot")))?;
        }
        info!(dir = %keep_dir.display(), "temporary files preserved");
        Ok(())
    }
}
