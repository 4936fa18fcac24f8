mod graph_io;
mod provenance;

use anyhow::{ensure, Result};
use clap::{Parser, Subcommand};
use provenance::RunRecord;
use scallop::api::{
    draw_splice_graph, solve_dual, solve_single, GraphClass, Scallop, ScallopCfg, Strategy,
    SubsetSumCfg, SynthCfg, SynthCount, SynthReplay,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "scallop-cli")]
#[command(about = "Splice-graph decomposition runner")]
struct Cmd {
    /// Label recorded in provenance sidecars (repeatable)
    #[arg(long = "tag", global = true)]
    tags: Vec<String>,

    /// Log per-round engine detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Decompose an edge-list splice graph into weighted paths
    Assemble {
        /// CSV or Parquet with columns source,target,weight[,stddev]
        #[arg(long)]
        input: PathBuf,
        /// basic | core | full | greedy
        #[arg(long, default_value = "full")]
        algo: Strategy,
        /// Paths JSON; a provenance sidecar is written next to it
        #[arg(long)]
        out: PathBuf,
        /// Also try pair-seeded equations
        #[arg(long)]
        pair_equations: bool,
        #[arg(long)]
        max_iterations: Option<usize>,
        #[arg(long)]
        max_error_ratio: Option<f64>,
        /// Rescale oversized subset-sum tables
        #[arg(long)]
        rescale: bool,
        /// Render every round as `<prefix>.<round>.tex`
        #[arg(long)]
        tex_prefix: Option<String>,
    },
    /// Run a subset-sum solver and print the result as JSON
    Subsetsum {
        /// Items, then the target as the last value (single); first pool (dual)
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        values: Vec<usize>,
        /// Match two pools against each other
        #[arg(long, requires = "target_values")]
        dual: bool,
        /// Second pool for `--dual`
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        target_values: Vec<usize>,
        #[arg(long, default_value_t = 10)]
        max_solutions: usize,
        #[arg(long)]
        rescale: bool,
    },
    /// Write a reproducible random splice graph as CSV
    Generate {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 3)]
        min_vertices: usize,
        #[arg(long, default_value_t = 8)]
        max_vertices: usize,
    },
    /// Print the provenance block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Assemble {
            input,
            algo,
            out,
            pair_equations,
            max_iterations,
            max_error_ratio,
            rescale,
            tex_prefix,
        } => {
            let mut cfg = ScallopCfg {
                algo,
                use_pair_equations: pair_equations,
                rescale_dp_table: rescale,
                output_tex_files: tex_prefix.is_some(),
                ..ScallopCfg::default()
            };
            if let Some(n) = max_iterations {
                cfg.max_iterations = n;
            }
            if let Some(r) = max_error_ratio {
                cfg.max_equation_error_ratio = r;
            }
            if let Some(prefix) = tex_prefix {
                cfg.tex_prefix = prefix;
            }
            assemble(&input, cfg, &out, &cmd.tags)
        }
        Action::Subsetsum {
            values,
            dual,
            target_values,
            max_solutions,
            rescale,
        } => {
            let cfg = SubsetSumCfg {
                max_solutions,
                rescale,
                ..SubsetSumCfg::default()
            };
            subsetsum(&values, dual.then_some(target_values.as_slice()), cfg)
        }
        Action::Generate {
            seed,
            index,
            out,
            min_vertices,
            max_vertices,
        } => generate(seed, index, &out, min_vertices, max_vertices, &cmd.tags),
        Action::Report => report(&cmd.tags),
    }
}

#[derive(Serialize)]
struct PathRecord<'a> {
    vertices: &'a [usize],
    abundance: f64,
}

#[derive(Serialize)]
struct AssembleOutput<'a> {
    name: &'a str,
    class: &'static str,
    algo: &'static str,
    rounds: usize,
    paths: Vec<PathRecord<'a>>,
}

fn assemble(input: &Path, cfg: ScallopCfg, out: &Path, tags: &[String]) -> Result<()> {
    let gr = graph_io::read_edges(input)?;
    let name = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());
    let algo = cfg.algo;
    let params = json!({
        "input": input.to_string_lossy(),
        "algo": algo.as_str(),
        "max_equation_error_ratio": cfg.max_equation_error_ratio,
        "use_pair_equations": cfg.use_pair_equations,
        "rescale_dp_table": cfg.rescale_dp_table,
        "max_iterations": cfg.max_iterations,
    });

    let record = RunRecord::new("assemble", params).with_graph(&gr).with_tags(tags);
    let mut sc = Scallop::new(name.as_str(), gr, cfg);
    sc.assemble();
    let class = sc.class().map_or("unclassified", GraphClass::as_str);
    let doc = AssembleOutput {
        name: &name,
        class,
        algo: algo.as_str(),
        rounds: sc.round(),
        paths: sc
            .paths()
            .iter()
            .map(|p| PathRecord {
                vertices: &p.vertices,
                abundance: p.abundance,
            })
            .collect(),
    };
    tracing::info!(
        name = %name,
        class,
        paths = doc.paths.len(),
        edges_left = sc.graph().num_edges(),
        "assembled"
    );

    create_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)?;
    provenance::write_sidecar(out, &record)?;
    Ok(())
}

fn subsetsum(values: &[usize], targets: Option<&[usize]>, cfg: SubsetSumCfg) -> Result<()> {
    let doc = match targets {
        Some(targets) => {
            let s: Vec<(usize, usize)> = values.iter().copied().zip(0..).collect();
            let t: Vec<(usize, usize)> =
                targets.iter().copied().zip(values.len()..).collect();
            match solve_dual(&s, &t) {
                Some(sol) => json!({ "error": sol.error, "s": sol.s, "t": sol.t }),
                None => serde_json::Value::Null,
            }
        }
        None => {
            ensure!(values.len() >= 2, "need at least one item and a target");
            let sols: Vec<_> = solve_single(values, cfg)
                .into_iter()
                .map(|sol| json!({ "sum": sol.sum, "indices": sol.indices }))
                .collect();
            json!(sols)
        }
    };
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn generate(
    seed: u64,
    index: u64,
    out: &Path,
    min_vertices: usize,
    max_vertices: usize,
    tags: &[String],
) -> Result<()> {
    ensure!(min_vertices <= max_vertices, "--min-vertices exceeds --max-vertices");
    let cfg = SynthCfg {
        internal_vertices: SynthCount::Uniform {
            min: min_vertices,
            max: max_vertices,
        },
        ..SynthCfg::default()
    };
    let sg = draw_splice_graph(cfg, SynthReplay { seed, index });
    graph_io::write_edges(out, &sg.graph)?;
    tracing::info!(
        seed,
        index,
        vertices = sg.graph.num_vertices(),
        edges = sg.graph.num_edges(),
        transcripts = sg.transcripts.len(),
        "generated splice graph"
    );
    let truth: Vec<_> = sg
        .transcripts
        .iter()
        .map(|p| json!({ "vertices": p.vertices, "abundance": p.abundance }))
        .collect();
    let params = json!({
        "seed": seed,
        "index": index,
        "internal_vertices": [min_vertices, max_vertices],
        "transcripts": truth,
    });
    let record = RunRecord::new("generate", params)
        .with_graph(&sg.graph)
        .with_tags(tags);
    provenance::write_sidecar(out, &record)?;
    Ok(())
}

fn report(tags: &[String]) -> Result<()> {
    let record = RunRecord::new("report", json!({})).with_tags(tags);
    println!("{}", serde_json::to_string_pretty(&record.stamp(Vec::new()))?);
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
