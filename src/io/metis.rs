//! METIS graph file reader and writer.
//!
//! # Supported format
//! - Lines starting with `%` are comments and may appear anywhere.
//! - Header: `<nodes> <edges> [<fmt> [<ncon>]]` where `fmt` is one of
//!   `0` (no weights), `1` (edge weights), `10` (node weights) or `11` (both).
//! - One record per node, in id order. With node weights the first token
//!   is the node weight. The remaining tokens are 1-based neighbor ids,
//!   each followed by the edge weight when edge weights are enabled.
//! - A blank record is a node with weight 0 and no adjacency of its own.
//!
//! # Limitations
//! - Multi-constraint node weights (`ncon > 1`) are not supported.
//! - Vertex sizes (the leading digit of a 3-digit `fmt`) are not supported.
//! - Weights are non-negative integers.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeInsert, Graph, GraphBuilder, Weight};
use crate::graph_error::{FormatError, MetisGraphError};
use crate::io::{GraphReader, GraphWriter};

/// Weight channels present in a METIS file, decoded from the header's
/// format code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetisFormat {
    pub node_weights: bool,
    pub edge_weights: bool,
}

impl MetisFormat {
    pub const UNWEIGHTED: Self = Self::new(false, false);
    pub const EDGE_WEIGHTS: Self = Self::new(false, true);
    pub const NODE_WEIGHTS: Self = Self::new(true, false);
    pub const BOTH: Self = Self::new(true, true);

    pub const fn new(node_weights: bool, edge_weights: bool) -> Self {
        Self {
            node_weights,
            edge_weights,
        }
    }

    /// Decode a header format code. Returns `None` for anything outside
    /// `{0, 1, 10, 11}`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::UNWEIGHTED),
            1 => Some(Self::EDGE_WEIGHTS),
            10 => Some(Self::NODE_WEIGHTS),
            11 => Some(Self::BOTH),
            _ => None,
        }
    }

    /// The header format code for this combination of channels.
    pub fn code(self) -> u32 {
        match (self.node_weights, self.edge_weights) {
            (false, false) => 0,
            (false, true) => 1,
            (true, false) => 10,
            (true, true) => 11,
        }
    }
}

/// Decoded METIS header line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetisHeader {
    pub node_count: usize,
    pub edge_count: usize,
    pub format: MetisFormat,
    /// 1-based line number of the header in the source.
    pub line: usize,
}

impl MetisHeader {
    /// Parse the header from the first non-comment line.
    pub fn parse(text: &str, line: usize) -> Result<Self, FormatError> {
        let malformed = |reason: String| FormatError::MalformedHeader { line, reason };
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() > 4 {
            return Err(malformed(format!(
                "expected at most 4 fields, found {}",
                tokens.len()
            )));
        }
        let node_count = match tokens.first() {
            Some(tok) => tok
                .parse::<usize>()
                .map_err(|_| malformed(format!("invalid node count `{tok}`")))?,
            None => return Err(malformed("missing node count".into())),
        };
        let edge_count = match tokens.get(1) {
            Some(tok) => tok
                .parse::<usize>()
                .map_err(|_| malformed(format!("invalid edge count `{tok}`")))?,
            None => return Err(malformed("missing edge count".into())),
        };
        let format = match tokens.get(2) {
            Some(tok) => tok
                .parse::<u32>()
                .ok()
                .and_then(MetisFormat::from_code)
                .ok_or_else(|| FormatError::UnsupportedFormatCode {
                    line,
                    code: (*tok).to_string(),
                })?,
            None => MetisFormat::UNWEIGHTED,
        };
        if let Some(tok) = tokens.get(3) {
            let ncon = tok
                .parse::<u64>()
                .map_err(|_| malformed(format!("invalid constraint count `{tok}`")))?;
            if ncon != 1 {
                return Err(FormatError::UnsupportedConstraintCount { line, ncon });
            }
        }
        Ok(Self {
            node_count,
            edge_count,
            format,
            line,
        })
    }
}

/// Reader for METIS graph files.
#[derive(Debug, Default, Clone)]
pub struct MetisReader;

/// Upper bound on storage reserved from header counts; the rest grows on demand.
const MAX_PREALLOC: usize = 1 << 16;

/// Where the reader is in the file.
enum ReadState {
    /// No non-comment line seen yet.
    AwaitingHeader,
    /// Header decoded; each further line is one node record.
    ReadingRecords(Records),
}

struct Records {
    header: MetisHeader,
    builder: GraphBuilder,
    /// Non-blank lines found after the last declared record.
    surplus: usize,
}

impl Records {
    fn new(header: MetisHeader) -> Self {
        Self {
            builder: GraphBuilder::with_capacity(
                header.node_count.min(MAX_PREALLOC),
                header.edge_count.min(MAX_PREALLOC),
                header.format.node_weights,
                header.format.edge_weights,
            ),
            header,
            surplus: 0,
        }
    }

    fn push_line(&mut self, text: &str, line: usize) -> Result<(), FormatError> {
        let blank = text.trim().is_empty();
        if self.builder.node_count() == self.header.node_count {
            if blank {
                log::warn!("line {line}: ignoring blank line after the last node record");
            } else {
                self.surplus += 1;
            }
            return Ok(());
        }
        if blank {
            let node = self.builder.add_node(0);
            log::trace!("line {line}: node {node} is blank");
            return Ok(());
        }
        self.push_record(text, line)
    }

    fn push_record(&mut self, text: &str, line: usize) -> Result<(), FormatError> {
        let format = self.header.format;
        let node_count = self.header.node_count;
        let mut tokens = text.split_whitespace();

        let weight = if format.node_weights {
            // non-blank, so there is at least one token
            match tokens.next() {
                Some(tok) => parse_weight(tok, line, "node weight")?,
                None => 0,
            }
        } else {
            0
        };
        let node = self.builder.add_node(weight);

        let mut degree = 0usize;
        while let Some(tok) = tokens.next() {
            let neighbor = parse_neighbor(tok, line, node_count)?;
            let edge_weight = if format.edge_weights {
                let tok = tokens
                    .next()
                    .ok_or(FormatError::DanglingEdgeWeight { line, neighbor })?;
                Some(parse_weight(tok, line, "edge weight")?)
            } else {
                None
            };
            match self.builder.add_edge(node, neighbor - 1, edge_weight) {
                EdgeInsert::Inserted | EdgeInsert::Duplicate => {}
                EdgeInsert::SelfLoop => {
                    log::warn!("line {line}: node {neighbor} lists itself; dropping the loop");
                    continue;
                }
                EdgeInsert::WeightConflict { existing } => {
                    return Err(FormatError::AsymmetricEdgeWeight {
                        line,
                        u: node + 1,
                        v: neighbor,
                        first: existing,
                        second: edge_weight.unwrap_or_default(),
                    });
                }
            }
            degree += 1;
        }
        log::trace!("line {line}: node {node} weight={weight} degree={degree}");
        Ok(())
    }

    fn finish(self) -> Result<Graph, MetisGraphError> {
        let header = self.header;
        let nodes = self.builder.node_count() + self.surplus;
        if nodes != header.node_count {
            return Err(FormatError::CountMismatch {
                what: "nodes",
                expected: header.node_count,
                actual: nodes,
            }
            .into());
        }
        let edges = self.builder.edge_count();
        if edges != header.edge_count {
            return Err(FormatError::CountMismatch {
                what: "edges",
                expected: header.edge_count,
                actual: edges,
            }
            .into());
        }
        let graph = self.builder.build()?;
        log::debug!(
            "read METIS graph: {} nodes, {} edges, fmt={}",
            graph.node_count(),
            graph.edge_count(),
            header.format.code()
        );
        Ok(graph)
    }
}

fn parse_weight(tok: &str, line: usize, what: &'static str) -> Result<Weight, FormatError> {
    match tok.parse::<Weight>() {
        Ok(w) if w >= 0 => Ok(w),
        _ => Err(FormatError::InvalidNumber {
            line,
            what,
            token: tok.to_string(),
        }),
    }
}

/// Parse a 1-based neighbor id and check it against the declared node count.
fn parse_neighbor(tok: &str, line: usize, node_count: usize) -> Result<usize, FormatError> {
    let neighbor = tok.parse::<usize>().map_err(|_| FormatError::InvalidNumber {
        line,
        what: "neighbor id",
        token: tok.to_string(),
    })?;
    if neighbor == 0 || neighbor > node_count {
        return Err(FormatError::NeighborOutOfRange {
            line,
            neighbor,
            node_count,
        });
    }
    Ok(neighbor)
}

impl MetisReader {
    /// Parse a graph held in memory.
    pub fn parse_str(&self, text: &str) -> Result<Graph, MetisGraphError> {
        self.read(text.as_bytes())
    }

    /// Parse the graph stored at `path`.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Graph, MetisGraphError> {
        let path = path.as_ref();
        log::debug!("reading METIS graph from {}", path.display());
        let file = File::open(path)?;
        self.read(file)
    }

    /// Parse only the header, stopping after the first non-comment line.
    pub fn read_header<R: Read>(&self, reader: R) -> Result<MetisHeader, MetisGraphError> {
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line_text = line?;
            if line_text.starts_with('%') || line_text.trim().is_empty() {
                continue;
            }
            return Ok(MetisHeader::parse(&line_text, idx + 1)?);
        }
        Err(FormatError::MissingHeader.into())
    }
}

impl GraphReader for MetisReader {
    fn read<R: Read>(&self, reader: R) -> Result<Graph, MetisGraphError> {
        let mut state = ReadState::AwaitingHeader;
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line_text = line?;
            let line_no = idx + 1;
            if line_text.starts_with('%') {
                continue;
            }
            if let ReadState::ReadingRecords(records) = &mut state {
                records.push_line(&line_text, line_no)?;
                continue;
            }
            if line_text.trim().is_empty() {
                continue;
            }
            let header = MetisHeader::parse(&line_text, line_no)?;
            log::debug!(
                "METIS header at line {line_no}: {} nodes, {} edges, node weights={}, edge weights={}",
                header.node_count,
                header.edge_count,
                header.format.node_weights,
                header.format.edge_weights
            );
            state = ReadState::ReadingRecords(Records::new(header));
        }
        match state {
            ReadState::AwaitingHeader => Err(FormatError::MissingHeader.into()),
            ReadState::ReadingRecords(records) => records.finish(),
        }
    }
}

/// Read the METIS graph stored at `path`.
pub fn read_metis(path: impl AsRef<Path>) -> Result<Graph, MetisGraphError> {
    MetisReader.read_path(path)
}

/// Writer for METIS graph files.
///
/// The format code is chosen from the graph's weight flags and every edge
/// is listed from both endpoints, so the output reads back to an equal
/// graph. Edges without a weight in an edge-weighted graph are written
/// with weight 0.
#[derive(Debug, Default, Clone)]
pub struct MetisWriter;

impl MetisWriter {
    /// Serialize `graph` into a `String`.
    pub fn write_string(&self, graph: &Graph) -> Result<String, MetisGraphError> {
        let mut buf = Vec::new();
        self.write(&mut buf, graph)?;
        String::from_utf8(buf).map_err(|e| MetisGraphError::Io(e.to_string()))
    }
}

impl GraphWriter for MetisWriter {
    fn write<W: Write>(&self, writer: W, graph: &Graph) -> Result<(), MetisGraphError> {
        let format = MetisFormat::new(graph.has_node_weights(), graph.has_edge_weights());
        let mut out = BufWriter::new(writer);
        if format.code() == 0 {
            writeln!(out, "{} {}", graph.node_count(), graph.edge_count())?;
        } else {
            writeln!(
                out,
                "{} {} {}",
                graph.node_count(),
                graph.edge_count(),
                format.code()
            )?;
        }
        for node in 0..graph.node_count() {
            let mut fields: Vec<String> = Vec::with_capacity(1 + 2 * graph.degree(node));
            if format.node_weights {
                fields.push(graph.node_weights()[node].to_string());
            }
            for nbr in graph.neighbors(node) {
                fields.push((nbr.id + 1).to_string());
                if format.edge_weights {
                    fields.push(nbr.weight.unwrap_or(0).to_string());
                }
            }
            writeln!(out, "{}", fields.join(" "))?;
        }
        out.flush()?;
        log::debug!(
            "wrote METIS graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(())
    }
}

/// Write `graph` to `path` in METIS format.
pub fn write_metis(path: impl AsRef<Path>, graph: &Graph) -> Result<(), MetisGraphError> {
    let file = File::create(path.as_ref())?;
    MetisWriter.write(file, graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Graph, MetisGraphError> {
        MetisReader.parse_str(text)
    }

    fn format_err(text: &str) -> FormatError {
        match parse(text) {
            Err(MetisGraphError::Format(e)) => e,
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn format_code_table() {
        assert_eq!(MetisFormat::from_code(0), Some(MetisFormat::UNWEIGHTED));
        assert_eq!(MetisFormat::from_code(1), Some(MetisFormat::EDGE_WEIGHTS));
        assert_eq!(MetisFormat::from_code(10), Some(MetisFormat::NODE_WEIGHTS));
        assert_eq!(MetisFormat::from_code(11), Some(MetisFormat::BOTH));
        for bad in [2, 9, 12, 100, 101, 111] {
            assert_eq!(MetisFormat::from_code(bad), None, "code {bad}");
        }
        for code in [0, 1, 10, 11] {
            assert_eq!(MetisFormat::from_code(code).map(MetisFormat::code), Some(code));
        }
    }

    #[test]
    fn header_defaults_to_unweighted() {
        let h = MetisHeader::parse("4 5", 1).unwrap();
        assert_eq!(h.node_count, 4);
        assert_eq!(h.edge_count, 5);
        assert_eq!(h.format, MetisFormat::UNWEIGHTED);
    }

    #[test]
    fn header_accepts_zero_padded_code_and_single_constraint() {
        let h = MetisHeader::parse("2 1 011 1", 3).unwrap();
        assert_eq!(h.format, MetisFormat::BOTH);
        assert_eq!(h.line, 3);
    }

    #[test]
    fn header_rejects_bad_fields() {
        assert!(matches!(
            MetisHeader::parse("4", 1),
            Err(FormatError::MalformedHeader { line: 1, .. })
        ));
        assert!(matches!(
            MetisHeader::parse("x 2", 1),
            Err(FormatError::MalformedHeader { .. })
        ));
        assert!(matches!(
            MetisHeader::parse("1 2 3 4 5", 1),
            Err(FormatError::MalformedHeader { .. })
        ));
        assert_eq!(
            MetisHeader::parse("3 2 2", 7),
            Err(FormatError::UnsupportedFormatCode {
                line: 7,
                code: "2".into()
            })
        );
        assert_eq!(
            MetisHeader::parse("3 2 10 3", 1),
            Err(FormatError::UnsupportedConstraintCount { line: 1, ncon: 3 })
        );
    }

    #[test]
    fn comments_before_and_between_records_are_skipped() {
        let g = parse("% a comment\n%another\n3 2\n2\n% inline\n1 3\n2\n").unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert_eq!(format_err(""), FormatError::MissingHeader);
        assert_eq!(format_err("% only\n% comments\n"), FormatError::MissingHeader);
    }

    #[test]
    fn blank_record_is_weightless_isolated_node() {
        let g = parse("3 1 10\n5 3\n\n7 1\n").unwrap();
        assert_eq!(g.node_weights(), &[5, 0, 7]);
        assert_eq!(g.degree(1), 0);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn node_weight_only_record_has_no_edges() {
        let g = parse("2 0 10\n4\n9\n").unwrap();
        assert_eq!(g.node_weights(), &[4, 9]);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn trailing_blank_lines_are_tolerated() {
        let g = parse("2 1\n2\n1\n\n\n").unwrap();
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn surplus_record_is_a_mismatch() {
        assert_eq!(
            format_err("2 1\n2\n1\n1\n"),
            FormatError::CountMismatch {
                what: "nodes",
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn neighbor_errors_carry_line_numbers() {
        assert_eq!(
            format_err("% c\n2 1\n3\n1\n"),
            FormatError::NeighborOutOfRange {
                line: 3,
                neighbor: 3,
                node_count: 2
            }
        );
        assert_eq!(
            format_err("2 1\n0\n1\n"),
            FormatError::NeighborOutOfRange {
                line: 2,
                neighbor: 0,
                node_count: 2
            }
        );
        assert!(matches!(
            format_err("2 1\nb\n1\n"),
            FormatError::InvalidNumber {
                line: 2,
                what: "neighbor id",
                ..
            }
        ));
    }

    #[test]
    fn edge_weight_errors() {
        assert_eq!(
            format_err("2 1 1\n2\n1 4\n"),
            FormatError::DanglingEdgeWeight {
                line: 2,
                neighbor: 2
            }
        );
        assert_eq!(
            format_err("2 1 1\n2 4\n1 5\n"),
            FormatError::AsymmetricEdgeWeight {
                line: 3,
                u: 2,
                v: 1,
                first: 4,
                second: 5
            }
        );
        assert!(matches!(
            format_err("2 1 1\n2 -4\n1 -4\n"),
            FormatError::InvalidNumber {
                what: "edge weight",
                ..
            }
        ));
    }

    #[test]
    fn self_references_are_dropped() {
        let g = parse("3 2\n1 2\n1 3\n2 3\n").unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        let ids: Vec<usize> = g.neighbors(0).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1]);
        let ids: Vec<usize> = g.neighbors(2).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn huge_header_counts_are_mismatches() {
        assert_eq!(
            format_err("2 18446744073709551615\n2\n1\n"),
            FormatError::CountMismatch {
                what: "edges",
                expected: usize::MAX,
                actual: 1
            }
        );
        assert_eq!(
            format_err("2 100000000000\n2\n1\n"),
            FormatError::CountMismatch {
                what: "edges",
                expected: 100_000_000_000,
                actual: 1
            }
        );
        assert_eq!(
            format_err("18446744073709551615 0\n\n"),
            FormatError::CountMismatch {
                what: "nodes",
                expected: usize::MAX,
                actual: 1
            }
        );
    }

    #[test]
    fn writer_picks_format_code() {
        let g = parse("2 1 11\n3 2 8\n4 1 8\n").unwrap();
        let text = MetisWriter.write_string(&g).unwrap();
        assert_eq!(text, "2 1 11\n3 2 8\n4 1 8\n");

        let g = parse("3 1\n2\n1\n\n").unwrap();
        let text = MetisWriter.write_string(&g).unwrap();
        assert_eq!(text, "3 1\n2\n1\n\n");
    }
}
