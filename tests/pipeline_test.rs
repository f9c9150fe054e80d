//! End-to-end pipeline tests with a scripted oracle and a stub layout
//! engine standing in for the external collaborators.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bandagraph::batch::{self, BatchOptions, BatchRow, RowOutcome};
use bandagraph::compose::{ComposeOptions, GraphComposer};
use bandagraph::config::GrapherConfig;
use bandagraph::cube::Cube;
use bandagraph::dot::DotGraph;
use bandagraph::error::Result;
use bandagraph::explore::{Exploration, ExplorationOracle};
use bandagraph::layout::LayoutEngine;
use bandagraph::render::projection::CUBE_MAP;

/// Oracle answering with a fixed four-state move graph.
struct ScriptedOracle;

impl ExplorationOracle for ScriptedOracle {
    fn normalize(&self, cube: &Cube) -> Result<Cube> {
        Ok(cube.clone())
    }

    fn explore(&self, cube: &Cube) -> Result<Exploration> {
        let edges = vec![(0, 1), (1, 0), (1, 2), (2, 3), (3, 0)];
        let mut labels = HashMap::new();
        labels.insert((0, 1), "L".to_string());
        labels.insert((1, 0), "L".to_string());
        labels.insert((1, 2), "R".to_string());
        labels.insert((2, 3), "UD".to_string());
        labels.insert((3, 0), "F".to_string());
        let cubes = (0..4).map(|id| (id, cube.clone())).collect();
        Ok(Exploration {
            nodes: vec![0, 1, 2, 3],
            edges,
            labels,
            cubes,
        })
    }
}

/// Records every graph it is asked to lay out and writes a placeholder
/// output file.
#[derive(Default)]
struct StubEngine {
    calls: Mutex<Vec<(String, PathBuf, DotGraph)>>,
}

impl StubEngine {
    fn calls(&self) -> Vec<(String, PathBuf, DotGraph)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LayoutEngine for StubEngine {
    fn render(&self, graph: &DotGraph, format: &str, output: &Path) -> Result<()> {
        fs::write(output, graph.to_dot())?;
        self.calls
            .lock()
            .unwrap()
            .push((format.to_string(), output.to_path_buf(), graph.clone()));
        Ok(())
    }
}

fn composer<'a>(config: &'a GrapherConfig, engine: &'a StubEngine) -> GraphComposer<'a> {
    GraphComposer {
        config,
        projection: &CUBE_MAP,
        engine,
    }
}

#[test]
fn single_render_with_legend_composes_two_images() {
    let config = GrapherConfig::default();
    let engine = StubEngine::default();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("33EC01800846.svg");

    batch::render_single(
        &composer(&config, &engine),
        &ScriptedOracle,
        "33EC01800846",
        &output,
        false,
        None,
    )
    .unwrap();

    assert!(output.exists());
    let calls = engine.calls();
    // Base graph, legend, composed wrapper.
    assert_eq!(calls.len(), 3);
    assert!(calls[0].1.to_string_lossy().ends_with("_graph.svg"));
    assert!(calls[1].1.to_string_lossy().ends_with("_index.svg"));
    assert_eq!(calls[2].1, output);

    let base = calls[0].2.to_dot();
    // Caption, layout algorithm and start pointer on the base graph.
    assert!(base.contains("label=\"33EC01800846 - (N=4 E=5) \";"));
    assert!(base.contains("layout=\"sfdp\";"));
    assert!(base.contains("\"start_pointer\" -> \"0\""));
    // Single-letter move in face color, composite move as wildcard.
    assert!(base.contains("color=\"green\""));
    assert!(base.contains("label=\"*\""));
    assert!(base.contains("color=\"#8020a0\""));

    let wrapper = calls[2].2.to_dot();
    assert!(wrapper.contains("\"graph_svg\""));
    assert!(wrapper.contains("\"index_svg\""));
    assert!(wrapper.contains("rankdir=\"LR\";"));
}

#[test]
fn skip_legend_renders_the_graph_directly() {
    let config = GrapherConfig::default();
    let engine = StubEngine::default();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("0.png");

    batch::render_single(
        &composer(&config, &engine),
        &ScriptedOracle,
        "0",
        &output,
        true,
        None,
    )
    .unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "png");
    assert_eq!(calls[0].1, output);
}

#[test]
fn four_states_land_in_the_cube_tier() {
    let config = GrapherConfig::default();
    let engine = StubEngine::default();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("0.svg");

    batch::render_single(
        &composer(&config, &engine),
        &ScriptedOracle,
        "0",
        &output,
        true,
        None,
    )
    .unwrap();

    // All four states fit the cube budget of 10: every node carries a
    // rendered thumbnail image.
    let dot = engine.calls()[0].2.to_dot();
    for id in 0..4 {
        assert!(dot.contains(&format!("_node_{id}.svg")), "node {id}");
    }
}

#[test]
fn temp_files_are_released_unless_preserved() {
    let config = GrapherConfig::default();
    let engine = StubEngine::default();
    let out_dir = tempfile::tempdir().unwrap();
    let keep_dir = out_dir.path().join("kept");
    let output = out_dir.path().join("graph.svg");

    let exploration = ScriptedOracle.explore(&Cube::new(1, vec![0]).unwrap()).unwrap();
    composer(&config, &engine)
        .draw(
            &exploration,
            "SIG",
            "SIG caption",
            &output,
            &ComposeOptions {
                skip_legend: false,
                keep_files: Some(&keep_dir),
            },
        )
        .unwrap();

    // The scoped temp directory is gone; its contents were copied.
    let tmp_graph = &engine.calls()[0].1;
    assert!(!tmp_graph.exists());
    assert!(keep_dir.join("SIG_graph.svg").exists());
    assert!(keep_dir.join("SIG_index.svg").exists());
    assert!(keep_dir.join("SIG_index_start.svg").exists());
    // Raw graph descriptions for debugging.
    assert!(keep_dir.join("SIG_graph.dot").exists());
    assert!(keep_dir.join("SIG_main.dot").exists());
}

#[test]
fn batch_reports_each_row() {
    let config = GrapherConfig::default();
    let engine = StubEngine::default();
    let out_dir = tempfile::tempdir().unwrap();

    let rows = vec![
        BatchRow {
            signature: "33EC01800846".to_string(),
            name: "Meffert".to_string(),
            ..BatchRow::default()
        },
        BatchRow {
            signature: String::new(),
            ..BatchRow::default()
        },
        BatchRow {
            signature: "not-a-signature".to_string(),
            ..BatchRow::default()
        },
        BatchRow {
            signature: "0".to_string(),
            ..BatchRow::default()
        },
    ];

    let report = batch::render_batch(
        &composer(&config, &engine),
        &ScriptedOracle,
        &rows,
        &BatchOptions {
            output_dir: out_dir.path(),
            format: "svg",
            node_filter: None,
            skip_unnamed: false,
            skip_legend: true,
            keep_files: None,
        },
    )
    .unwrap();

    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.rendered(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 1);
    assert!(out_dir.path().join("33EC01800846.svg").exists());
    assert!(out_dir.path().join("0.svg").exists());

    match &report.rows[0].1 {
        RowOutcome::Rendered { nodes, edges, .. } => {
            assert_eq!((*nodes, *edges), (4, 5));
        }
        other => panic!("expected rendered row, got {other:?}"),
    }
}

#[test]
fn batch_filters_by_node_count() {
    let config = GrapherConfig::default();
    let engine = StubEngine::default();
    let out_dir = tempfile::tempdir().unwrap();

    let rows = vec![
        // Known counts from the source: filtered without exploring.
        BatchRow {
            signature: "0".to_string(),
            known_nodes: 5000,
            known_edges: 9000,
            ..BatchRow::default()
        },
        BatchRow {
            signature: "33EC01800846".to_string(),
            ..BatchRow::default()
        },
    ];

    let report = batch::render_batch(
        &composer(&config, &engine),
        &ScriptedOracle,
        &rows,
        &BatchOptions {
            output_dir: out_dir.path(),
            format: "svg",
            node_filter: Some((1, 100)),
            skip_unnamed: false,
            skip_legend: true,
            keep_files: None,
        },
    )
    .unwrap();

    assert_eq!(report.skipped(), 1);
    assert_eq!(report.rendered(), 1);
    assert!(!out_dir.path().join("0.svg").exists());
}

#[test]
fn batch_skips_unnamed_rows_on_request() {
    let config = GrapherConfig::default();
    let engine = StubEngine::default();
    let out_dir = tempfile::tempdir().unwrap();

    let rows = vec![BatchRow {
        signature: "0".to_string(),
        ..BatchRow::default()
    }];

    let report = batch::render_batch(
        &composer(&config, &engine),
        &ScriptedOracle,
        &rows,
        &BatchOptions {
            output_dir: out_dir.path(),
            format: "svg",
            node_filter: None,
            skip_unnamed: true,
            skip_legend: true,
            keep_files: None,
        },
    )
    .unwrap();

    assert_eq!(report.skipped(), 1);
    assert_eq!(report.rendered(), 0);
}
