//! Boundary to the cube exploration oracle.
//!
//! Enumerating the states reachable from a bandaged cube is delegated to
//! an external explorer. The oracle exposes a normalization step and the
//! exploration itself; the pipeline always normalizes before exploring.

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::cube::Cube;
use crate::error::{GrapherError, Result};

/// The explored move graph of one cube.
#[derive(Debug, Clone, Default)]
pub struct Exploration {
    /// State identifiers; state 0 is the start state.
    pub nodes: Vec<u32>,
    /// Directed (source, destination) transitions.
    pub edges: Vec<(u32, u32)>,
    /// Edge to concatenated face-move letters; parallel moves between the
    /// same two states are merged into one label string.
    pub labels: HashMap<(u32, u32), String>,
    /// State id to its cube, where known.
    pub cubes: HashMap<u32, Cube>,
}

pub trait ExplorationOracle {
    /// Canonical form of a raw cube.
    fn normalize(&self, cube: &Cube) -> Result<Cube>;

    /// Enumerate reachable states and transitions from a normalized cube.
    fn explore(&self, cube: &Cube) -> Result<Exploration>;
}

#[derive(Serialize)]
struct WireCubeRef<'a> {
    order: usize,
    cells: &'a [u32],
}

#[derive(Deserialize)]
struct WireCube {
    order: usize,
    cells: Vec<u32>,
}

impl WireCube {
    fn into_cube(self) -> Result<Cube> {
        Cube::new(self.order, self.cells)
            .map_err(|e| GrapherError::Explore(format!("oracle returned a malformed cube: {e}")))
    }
}

#[derive(Deserialize)]
struct WireExploration {
    nodes: Vec<u32>,
    edges: Vec<(u32, u32)>,
    labels: Vec<(u32, u32, String)>,
    cubes: Vec<(u32, WireCube)>,
}

/// Oracle adapter invoking an external explorer process.
///
/// The explorer is called as `<command> normalize` or `<command> explore`
/// with a JSON cube on stdin and answers with a JSON cube or exploration
/// on stdout.
pub struct CommandOracle {
    command: Vec<String>,
}

impl CommandOracle {
    pub fn new(command_line: &str) -> Result<Self> {
        let command: Vec<String> = command_line.split_whitespace().map(str::to_string).collect();
        if command.is_empty() {
            return Err(GrapherError::Explore(
                "explorer command is empty".to_string(),
            ));
        }
        Ok(Self { command })
    }

    fn run(&self, subcommand: &str, cube: &Cube) -> Result<Vec<u8>> {
        let input = serde_json::to_vec(&WireCubeRef {
            order: cube.order(),
            cells: cube.cells(),
        })
        .map_err(|e| GrapherError::Explore(e.to_string()))?;

        let mut child = Command::new(&self.command[0])
            .args(&self.command[1..])
            .arg(subcommand)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                GrapherError::Explore(format!("cannot start {:?}: {e}", self.command[0]))
            })?;

        child.stdin.take().expect("stdin was piped").write_all(&input)?;

        let output = child
            .wait_with_output()
            .map_err(|e| GrapherError::Explore(format!("explorer did not run: {e}")))?;
        if !output.status.success() {
            return Err(GrapherError::Explore(format!(
                "explorer exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

impl ExplorationOracle for CommandOracle {
    fn normalize(&self, cube: &Cube) -> Result<Cube> {
        let stdout = self.run("normalize", cube)?;
        let wire: WireCube = serde_json::from_slice(&stdout)
            .map_err(|e| GrapherError::Explore(format!("bad normalize response: {e}")))?;
        wire.into_cube()
    }

    fn explore(&self, cube: &Cube) -> Result<Exploration> {
        let stdout = self.run("explore", cube)?;
        let wire: WireExploration = serde_json::from_slice(&stdout)
            .map_err(|e| GrapherError::Explore(format!("bad explore response: {e}")))?;

        let mut labels = HashMap::with_capacity(wire.labels.len());
        for (src, dst, label) in wire.labels {
            labels.insert((src, dst), label);
        }
        let mut cubes = HashMap::with_capacity(wire.cubes.len());
        for (id, cube) in wire.cubes {
            cubes.insert(id, cube.into_cube()?);
        }
        Ok(Exploration {
            nodes: wire.nodes,
            edges: wire.edges,
            labels,
            cubes,
        })
    }
}
