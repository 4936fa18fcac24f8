use anyhow::{ensure, Context, Result};
use polars::prelude::*;
use scallop::api::SpliceGraph;
use std::fs::File;
use std::path::Path;

/// Read an edge list (`source,target,weight[,stddev]`) from CSV or Parquet.
///
/// Vertices are numbered in topological order: every edge must point from a
/// smaller to a larger index. The largest index seen is the sink.
pub fn read_edges(path: &Path) -> Result<SpliceGraph> {
    let lf = if path.extension().is_some_and(|ext| ext == "parquet") {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    let df = lf
        .collect()
        .with_context(|| format!("reading edge list {}", path.display()))?;

    let sources = int_column(&df, "source")?;
    let targets = int_column(&df, "target")?;
    let weights = float_column(&df, "weight")?;
    let stddevs = if df.column("stddev").is_ok() {
        float_column(&df, "stddev")?
    } else {
        vec![0.0; df.height()]
    };

    let mut n = 0usize;
    let mut edges = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let (s, t, w) = (sources[row], targets[row], weights[row]);
        ensure!(s >= 0 && t >= 0, "row {row}: negative vertex index");
        ensure!(s < t, "row {row}: edge ({s}, {t}) does not point forward");
        ensure!(w >= 0.0, "row {row}: negative weight {w}");
        let (s, t) = (s as usize, t as usize);
        n = n.max(t + 1);
        edges.push((s, t, w, stddevs[row]));
    }
    ensure!(n >= 2, "edge list {} is empty", path.display());
    tracing::info!(path = %path.display(), vertices = n, edges = edges.len(), "read splice graph");
    Ok(SpliceGraph::from_edges(n, &edges))
}

/// Write the live edges of `gr` as CSV with a header row.
pub fn write_edges(path: &Path, gr: &SpliceGraph) -> Result<()> {
    let (mut source, mut target) = (Vec::new(), Vec::new());
    let (mut weight, mut stddev) = (Vec::new(), Vec::new());
    for e in gr.edges() {
        let (s, t) = gr.endpoints(e);
        source.push(s as i64);
        target.push(t as i64);
        weight.push(gr.weight(e));
        stddev.push(gr.stddev(e));
    }
    let mut df = df!(
        "source" => source,
        "target" => target,
        "weight" => weight,
        "stddev" => stddev
    )?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Int64)?;
    s.i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("row {row}: empty `{name}`")))
        .collect()
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Float64)?;
    s.f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("row {row}: empty `{name}`")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scallop::api::{draw_splice_graph, SynthCfg, SynthReplay};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_csv_without_stddev() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.csv");
        fs::write(&path, "source,target,weight\n0,1,5\n0,2,5\n1,3,5\n2,3,5\n").unwrap();
        let gr = read_edges(&path).unwrap();
        assert_eq!(gr.num_vertices(), 4);
        assert_eq!(gr.num_edges(), 4);
        assert_eq!(gr.sink(), 3);
        assert!(gr.edges().all(|e| gr.stddev(e) == 0.0 && gr.weight(e) == 5.0));
    }

    #[test]
    fn rejects_backward_edges_and_missing_columns() {
        let dir = tempdir().unwrap();
        let back = dir.path().join("back.csv");
        fs::write(&back, "source,target,weight\n0,2,1\n2,1,1\n").unwrap();
        assert!(read_edges(&back).is_err());
        let partial = dir.path().join("partial.csv");
        fs::write(&partial, "source,target\n0,1\n").unwrap();
        assert!(read_edges(&partial).is_err());
    }

    #[test]
    fn written_graph_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/synthetic.csv");
        let sg = draw_splice_graph(SynthCfg::default(), SynthReplay { seed: 5, index: 2 });
        write_edges(&path, &sg.graph).unwrap();
        let gr = read_edges(&path).unwrap();
        assert_eq!(gr.num_edges(), sg.graph.num_edges());
        assert_eq!(gr.sink(), sg.graph.sink());
        let edges = |g: &SpliceGraph| -> Vec<(usize, usize, f64)> {
            g.edges()
                .map(|e| {
                    let (s, t) = g.endpoints(e);
                    (s, t, g.weight(e))
                })
                .collect()
        };
        assert_eq!(edges(&gr), edges(&sg.graph));
    }
}
