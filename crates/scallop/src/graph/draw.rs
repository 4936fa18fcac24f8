//! TikZ rendering for diagnostics.

use std::collections::HashMap;
use std::fmt::{self, Write};
use std::io;
use std::path::Path;

use super::{EdgeId, SpliceGraph};

impl SpliceGraph {
    /// Write a standalone TikZ picture. Vertices are placed left to right in
    /// topological order; missing labels fall back to the index/weight.
    pub fn draw(
        &self,
        file: impl AsRef<Path>,
        vertex_labels: &HashMap<usize, String>,
        edge_labels: &HashMap<EdgeId, String>,
        len: f64,
    ) -> io::Result<()> {
        let mut doc = String::new();
        self.write_tikz(&mut doc, vertex_labels, edge_labels, len)
            .map_err(|_| io::Error::other("formatting TikZ document"))?;
        std::fs::write(file, doc)
    }

    fn write_tikz(
        &self,
        doc: &mut impl Write,
        vertex_labels: &HashMap<usize, String>,
        edge_labels: &HashMap<EdgeId, String>,
        len: f64,
    ) -> fmt::Result {
        writeln!(doc, "\\documentclass[tikz]{{standalone}}")?;
        writeln!(doc, "\\begin{{document}}")?;
        writeln!(doc, "\\begin{{tikzpicture}}")?;
        for (pos, v) in self.topological_order().into_iter().enumerate() {
            if self.degree(v) == 0 && v != self.source() && v != self.sink() {
                continue;
            }
            let label = vertex_labels
                .get(&v)
                .cloned()
                .unwrap_or_else(|| format!("{v}:{:.0}", self.vertex_weight(v)));
            writeln!(
                doc,
                "\\node[draw, circle] (v{v}) at ({:.2}, 0) {{{label}}};",
                pos as f64 * len
            )?;
        }
        for e in self.edges() {
            let (s, t) = self.endpoints(e);
            let label = edge_labels
                .get(&e)
                .cloned()
                .unwrap_or_else(|| format!("{e}:{:.0}", self.weight(e)));
            writeln!(
                doc,
                "\\draw[->] (v{s}) to[bend left=30] node[above, font=\\tiny] {{{label}}} (v{t});"
            )?;
        }
        writeln!(doc, "\\end{{tikzpicture}}")?;
        writeln!(doc, "\\end{{document}}")
    }
}
