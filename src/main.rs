//! Bandagraph CLI - draw bandaged cube state graphs from signatures.

use anyhow::{bail, Context, Result};
use bandagraph::batch::{self, BatchOptions};
use bandagraph::compose::GraphComposer;
use bandagraph::config::GrapherConfig;
use bandagraph::explore::CommandOracle;
use bandagraph::layout::GraphvizEngine;
use bandagraph::render::projection::{Projection, CUBE_MAP, ISOMETRIC};
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "bandagraph")]
#[command(about = "Draw bandaged cube state graphs as vector images")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "bandagraph.toml")]
    config: PathBuf,

    /// Output directory
    #[arg(long)]
    output_directory: Option<PathBuf>,

    /// Output file format like "png", "pdf" or "svg"
    #[arg(long)]
    file_format: Option<String>,

    /// Skip drawing of the legend
    #[arg(long)]
    skip_legend_draw: bool,

    /// The cube drawing projection
    #[arg(long, value_enum, default_value = "cube-map")]
    cube_draw_projection: ProjectionArg,

    /// Process a csv file containing cube signatures
    #[arg(long)]
    process_csv_file: Option<PathBuf>,

    /// Skip cubes without names from the csv file
    #[arg(long)]
    skip_cubes_without_names: bool,

    /// Process only cubes with a node count in range min-max, e.g. 100-500
    #[arg(long)]
    filter_by_number_of_nodes: Option<String>,

    /// Preserve temporary thumbnail and graph-description files here
    #[arg(long)]
    keep_temporary_files: Option<PathBuf>,

    /// Cube hex or 27-label signatures
    cube_signatures: Vec<String>,
}

#[derive(Clone, ValueEnum, Debug)]
enum ProjectionArg {
    /// Unfolded cross layout
    CubeMap,
    /// Two isometric corner views
    Isometric,
}

impl ProjectionArg {
    fn to_projection(&self) -> &'static Projection {
        match self {
            ProjectionArg::CubeMap => &CUBE_MAP,
            ProjectionArg::Isometric => &ISOMETRIC,
        }
    }
}

fn parse_node_filter(text: &str) -> Result<(usize, usize)> {
    let (min, max) = text
        .split_once('-')
        .with_context(|| format!("expected min-max, got {text:?}"))?;
    Ok((
        min.trim().parse().context("bad minimum node count")?,
        max.trim().parse().context("bad maximum node count")?,
    ))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bandagraph=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = GrapherConfig::load(Path::new(&cli.config))?;

    if cli.cube_signatures.is_empty() && cli.process_csv_file.is_none() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let output_directory = cli
        .output_directory
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let file_format = cli.file_format.unwrap_or_else(|| config.output.format.clone());
    let projection = cli.cube_draw_projection.to_projection();

    let explorer_command = config
        .explorer
        .command
        .as_deref()
        .context("no explorer command configured; set explorer.command in the config")?;
    let oracle = CommandOracle::new(explorer_command)?;
    let engine = GraphvizEngine::new(&config.layout.command);
    let composer = GraphComposer {
        config: &config,
        projection,
        engine: &engine,
    };

    let node_filter = cli
        .filter_by_number_of_nodes
        .as_deref()
        .map(parse_node_filter)
        .transpose()?;

    if !cli.cube_signatures.is_empty() {
        std::fs::create_dir_all(&output_directory)?;
        for signature in &cli.cube_signatures {
            let output = output_directory.join(format!("{signature}.{file_format}"));
            println!("Processing cube {}, file: {}", signature, output.display());
            if let Err(e) = batch::render_single(
                &composer,
                &oracle,
                signature,
                &output,
                cli.skip_legend_draw,
                cli.keep_temporary_files.as_deref(),
            ) {
                warn!(signature = %signature, error = %e, "cube skipped");
            }
        }
    }

    if let Some(csv_file) = &cli.process_csv_file {
        println!("Processing csv file {}", csv_file.display());
        let rows = batch::read_csv_rows(csv_file)?;
        if rows.is_empty() {
            bail!("csv file has no rows");
        }
        let report = batch::render_batch(
            &composer,
            &oracle,
            &rows,
            &BatchOptions {
                output_dir: &output_directory,
                format: &file_format,
                node_filter,
                skip_unnamed: cli.skip_cubes_without_names,
                skip_legend: cli.skip_legend_draw,
                keep_files: cli.keep_temporary_files.as_deref(),
            },
        )?;
        println!(
            "Batch done: {} rendered, {} skipped, {} failed",
            report.rendered(),
            report.skipped(),
            report.failed()
        );
    }

    Ok(())
}
