use anyhow::{Context, Result};
use scallop::api::SpliceGraph;
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Shape of the splice graph a run consumed or produced.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
    /// Summed weight on the source's out-edges.
    pub source_flow: f64,
}

impl GraphSummary {
    pub fn of(gr: &SpliceGraph) -> Self {
        let source_flow = gr
            .out_edges(gr.source())
            .iter()
            .map(|&e| gr.weight(e))
            .sum();
        Self {
            vertices: gr.num_vertices(),
            edges: gr.num_edges(),
            source_flow,
        }
    }
}

/// What a subcommand ran with; becomes the body of a sidecar.
pub struct RunRecord {
    pub command: &'static str,
    pub params: Value,
    pub graph: Option<GraphSummary>,
    /// Free-form labels passed with `--tag`.
    pub tags: Vec<String>,
}

impl RunRecord {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            graph: None,
            tags: Vec::new(),
        }
    }

    pub fn with_graph(mut self, gr: &SpliceGraph) -> Self {
        self.graph = Some(GraphSummary::of(gr));
        self
    }

    pub fn with_tags(mut self, tags: &[String]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }

    pub fn stamp(&self, outputs: Vec<String>) -> Stamp<'_> {
        Stamp {
            scallop_version: scallop::VERSION,
            code_rev: code_rev(),
            command: self.command,
            tags: &self.tags,
            graph: self.graph,
            params: &self.params,
            outputs,
            callsite: None,
        }
    }
}

#[derive(Serialize)]
pub struct Stamp<'a> {
    pub scallop_version: &'static str,
    pub code_rev: String,
    pub command: &'static str,
    pub tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphSummary>,
    pub params: &'a Value,
    pub outputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsite: Option<Callsite>,
}

#[derive(Serialize)]
pub struct Callsite {
    file: &'static str,
    line: u32,
}

/// Write `<artifact stem>.provenance.json` beside `artifact`.
#[track_caller]
pub fn write_sidecar(artifact: &Path, record: &RunRecord) -> Result<PathBuf> {
    let caller = Location::caller();
    let path = sidecar_path(artifact);
    let mut stamp = record.stamp(vec![artifact.display().to_string()]);
    stamp.callsite = Some(Callsite {
        file: caller.file(),
        line: caller.line(),
    });
    let body = serde_json::to_vec_pretty(&stamp)?;
    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), command = record.command, "wrote provenance");
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// Build-time `SCALLOP_GIT_REV`, then the runtime variable, then `git`.
fn code_rev() -> String {
    let pinned = option_env!("SCALLOP_GIT_REV").map(str::to_string);
    pinned
        .into_iter()
        .chain(std::env::var("SCALLOP_GIT_REV").ok())
        .find(|rev| !rev.is_empty())
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "--short=12", "HEAD"]).output().ok()?;
            out.status.success().then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
