//! Single and batch rendering drivers.
//!
//! A batch iterates its rows strictly sequentially and records an explicit
//! per-row outcome instead of aborting: a bad signature or a failed render
//! marks the row and processing continues. Only filesystem failures and a
//! missing signature column are fatal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::compose::{ComposeOptions, GraphComposer};
use crate::error::{GrapherError, Result};
use crate::explore::ExplorationOracle;
use crate::signature;

/// One input row of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchRow {
    pub signature: String,
    pub name: String,
    /// Node count known ahead of time, 0 when unknown.
    pub known_nodes: usize,
    /// Edge count known ahead of time, 0 when unknown.
    pub known_edges: usize,
}

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Rendered {
        output: PathBuf,
        nodes: usize,
        edges: usize,
    },
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

/// Per-row outcomes of a completed batch iteration.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rows: Vec<(String, RowOutcome)>,
}

impl BatchReport {
    pub fn rendered(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Rendered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&RowOutcome) -> bool) -> usize {
        self.rows.iter().filter(|(_, outcome)| pred(outcome)).count()
    }
}

/// Settings shared by every row of a batch.
pub struct BatchOptions<'a> {
    pub output_dir: &'a Path,
    pub format: &'a str,
    /// Render only cubes whose node count lies in this inclusive range.
    pub node_filter: Option<(usize, usize)>,
    pub skip_unnamed: bool,
    pub skip_legend: bool,
    pub keep_files: Option<&'a Path>,
}

/// Read batch rows from a CSV file.
///
/// The `Hexa` column is required; `Name`, `N` and `E` are optional.
pub fn read_csv_rows(path: &Path) -> Result<Vec<BatchRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?;
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(k, name)| (name.to_string(), k))
        .collect();

    let signature_col = *columns
        .get("Hexa")
        .ok_or_else(|| GrapherError::Schema("Hexa".to_string()))?;
    let name_col = columns.get("Name").copied();
    let nodes_col = columns.get("N").copied();
    let edges_col = columns.get("E").copied();

    let field = |record: &csv::StringRecord, col: Option<usize>| {
        col.and_then(|k| record.get(k)).unwrap_or("").trim().to_string()
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(BatchRow {
            signature: field(&record, Some(signature_col)),
            name: field(&record, name_col),
            known_nodes: field(&record, nodes_col).parse().unwrap_or(0),
            known_edges: field(&record, edges_col).parse().unwrap_or(0),
        });
    }
    Ok(rows)
}

fn csv_error(e: csv::Error) -> GrapherError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => GrapherError::Io(io),
        other => GrapherError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("malformed csv: {other:?}"),
        )),
    }
}

/// Decode, explore and draw a single cube signature.
pub fn render_single(
    composer: &GraphComposer<'_>,
    oracle: &dyn ExplorationOracle,
    signature_text: &str,
    output: &Path,
    skip_legend: bool,
    keep_files: Option<&Path>,
) -> Result<()> {
    let cube = signature::decode_auto(signature_text)?;
    let exploration = oracle.explore(&oracle.normalize(&cube)?)?;
    let (nodes, edges) = (exploration.nodes.len(), exploration.edges.len());
    let caption = format!("{signature_text} - (N={nodes} E={edges}) ");
    info!(signature = signature_text, nodes, edges, "cube explored");

    composer.draw(
        &exploration,
        signature_text,
        &caption,
        output,
        &ComposeOptions {
            skip_legend,
            keep_files,
        },
    )
}

/// Render a batch of rows into `<output_dir>/<signature>.<format>`.
///
/// The result reflects whether the iteration completed, not whether every
/// row succeeded; per-row failures land in the report.
pub fn render_batch(
    composer: &GraphComposer<'_>,
    oracle: &dyn ExplorationOracle,
    rows: &[BatchRow],
    opts: &BatchOptions<'_>,
) -> Result<BatchReport> {
    std::fs::create_dir_all(opts.output_dir)?;

    let mut report = BatchReport::default();
    for (row_k, row) in rows.iter().enumerate() {
        let outcome = render_row(composer, oracle, row, row_k, rows.len(), opts);
        if let RowOutcome::Failed { reason } = &outcome {
            warn!(signature = %row.signature, reason = %reason, "cube failed");
        }
        report.rows.push((row.signature.clone(), outcome));
    }

    info!(
        rendered = report.rendered(),
        skipped = report.skipped(),
        failed = report.failed(),
        "batch finished"
    );
    Ok(report)
}

fn render_row(
    composer: &GraphComposer<'_>,
    oracle: &dyn ExplorationOracle,
    row: &BatchRow,
    row_k: usize,
    row_count: usize,
    opts: &BatchOptions<'_>,
) -> RowOutcome {
    if row.signature.is_empty() {
        return RowOutcome::Skipped {
            reason: "empty signature".to_string(),
        };
    }
    if opts.skip_unnamed && row.name.is_empty() {
        return RowOutcome::Skipped {
            reason: "cube has no name".to_string(),
        };
    }

    let cube = match signature::decode_auto(&row.signature) {
        Ok(cube) => cube,
        Err(e) => {
            return RowOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    let explore = || oracle.explore(&oracle.normalize(&cube)?);

    // Counts from the batch source let us filter without exploring.
    let mut exploration = None;
    let (mut nodes, mut edges) = (row.known_nodes, row.known_edges);
    if nodes == 0 || edges == 0 {
        match explore() {
            Ok(explored) => {
                nodes = explored.nodes.len();
                edges = explored.edges.len();
                exploration = Some(explored);
            }
            Err(e) => {
                return RowOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    if let Some((min_nodes, max_nodes)) = opts.node_filter {
        if nodes < min_nodes || nodes > max_nodes {
            info!(signature = %row.signature, nodes, "skipping filtered cube");
            return RowOutcome::Skipped {
                reason: format!("{nodes} nodes outside {min_nodes}-{max_nodes}"),
            };
        }
    }

    let exploration = match exploration {
        Some(explored) => explored,
        None => match explore() {
            Ok(explored) => explored,
            Err(e) => {
                return RowOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        },
    };
    let (nodes, edges) = (exploration.nodes.len(), exploration.edges.len());

    info!(
        signature = %row.signature,
        nodes,
        edges,
        row = row_k + 1,
        row_count,
        "processing cube"
    );

    let output = opts
        .output_dir
        .join(format!("{}.{}", row.signature, opts.format));
    let caption = format!(
        "{} - {} (N={nodes} E={edges}) ",
        row.signature, row.name
    );

    let compose_opts = ComposeOptions {
        skip_legend: opts.skip_legend,
        keep_files: opts.keep_files,
    };
    match composer.draw(&exploration, &row.signature, &caption, &output, &compose_opts) {
        Ok(()) => RowOutcome::Rendered {
            output,
            nodes,
            edges,
        },
        Err(e) => RowOutcome::Failed {
            reason: e.to_string(),
        },
    }
}
