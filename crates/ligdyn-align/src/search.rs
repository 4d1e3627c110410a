//! Local alignment of chain sequences against the reference database.
use crate::error::{Error, Result};
use roxmltree::{Document, Node, ParsingOptions};
use std::io::Write;
use std::ops::Range;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Reference protein a chain aligned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitId {
    pub accession: String,
    pub entry_name: String,
}

impl HitId {
    /// Parses `accession|entry_name`.
    pub fn parse(description: &str) -> Option<Self> {
        let mut fields = description.split('|');
        let accession = fields.next()?.trim();
        let entry_name = fields.next()?.trim();
        if accession.is_empty() || entry_name.is_empty() {
            return None;
        }
        Some(HitId {
            accession: accession.to_string(),
            entry_name: entry_name.to_string(),
        })
    }
}

/// An ungapped block of the alignment; both ranges are 0-based, half-open and
/// of equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPair {
    pub query: Range<usize>,
    pub target: Range<usize>,
}

/// The best high-scoring segment pair for one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub hit: HitId,
    pub evalue: f64,
    /// Identical positions over alignment length.
    pub identity: f64,
    pub segments: Vec<SegmentPair>,
}

pub trait SequenceSearch {
    /// Best hit for a one-letter sequence, or `None` when nothing aligned.
    fn best_hit(&self, sequence: &str) -> Result<Option<AlignmentResult>>;
}

/// NCBI `blastp` against a prebuilt protein database.
#[derive(Debug, Clone)]
pub struct Blastp {
    program: PathBuf,
    db: PathBuf,
}

impl Blastp {
    pub fn new(program: impl Into<PathBuf>, db: impl Into<PathBuf>) -> Self {
        Blastp {
            program: program.into(),
            db: db.into(),
        }
    }
}

impl SequenceSearch for Blastp {
    fn best_hit(&self, sequence: &str) -> Result<Option<AlignmentResult>> {
        let program = self.program.display().to_string();
        let search_error = |details: String| Error::Search {
            program: program.clone(),
            details,
        };
        log::info!("starting blast with sequence {sequence}");

        let mut child = Command::new(&self.program)
            .arg("-query")
            .arg("-")
            .arg("-db")
            .arg(&self.db)
            .args(["-outfmt", "5", "-max_target_seqs", "1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| search_error(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(sequence.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(search_error(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        parse_blast_xml(&String::from_utf8_lossy(&output.stdout))
    }
}

/// First HSP of the first hit in a `-outfmt 5` report.
pub fn parse_blast_xml(text: &str) -> Result<Option<AlignmentResult>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;

    let Some(hit) = doc.descendants().find(|n| n.has_tag_name("Hit")) else {
        log::warn!("search returned no hits");
        return Ok(None);
    };
    let Some(hsp) = hit.descendants().find(|n| n.has_tag_name("Hsp")) else {
        log::warn!("search hit has no HSP");
        return Ok(None);
    };

    let hit_id = text_of(hit, "Hit_id").unwrap_or_default();
    let description = if hit_id.starts_with("gnl|BL_ORD_ID") {
        text_of(hit, "Hit_def")
            .and_then(|def| def.split_whitespace().next())
            .unwrap_or_default()
    } else {
        hit_id
    };
    let Some(hit) = HitId::parse(description) else {
        log::warn!("cannot read reference identifier from '{description}'");
        return Ok(None);
    };

    let query_from: usize = number(hsp, "Hsp_query-from")?;
    let query_to: usize = number(hsp, "Hsp_query-to")?;
    let hit_from: usize = number(hsp, "Hsp_hit-from")?;
    let evalue: f64 = number(hsp, "Hsp_evalue")?;
    let identical: f64 = number(hsp, "Hsp_identity")?;
    let align_len: f64 = number(hsp, "Hsp_align-len")?;

    let query_start = query_from.saturating_sub(1);
    let hit_start = hit_from.saturating_sub(1);
    let segments = match (text_of(hsp, "Hsp_qseq"), text_of(hsp, "Hsp_hseq")) {
        (Some(qseq), Some(hseq)) => ungapped_blocks(qseq, hseq, query_start, hit_start),
        _ => {
            let len = query_to.saturating_sub(query_start);
            vec![SegmentPair {
                query: query_start..query_start + len,
                target: hit_start..hit_start + len,
            }]
        }
    };

    Ok(Some(AlignmentResult {
        hit,
        evalue,
        identity: if align_len > 0.0 { identical / align_len } else { 0.0 },
        segments,
    }))
}

/// Splits aligned strings at gaps into blocks of paired positions.
pub fn ungapped_blocks(qseq: &str, hseq: &str, query_start: usize, hit_start: usize) -> Vec<SegmentPair> {
    let mut blocks = Vec::new();
    let (mut q, mut h) = (query_start, hit_start);
    let mut open: Option<(usize, usize)> = None;

    for (qc, hc) in qseq.chars().zip(hseq.chars()) {
        match (qc == '-', hc == '-') {
            (false, false) => {
                open.get_or_insert((q, h));
                q += 1;
                h += 1;
            }
            (q_gap, h_gap) => {
                if let Some((qs, hs)) = open.take() {
                    blocks.push(SegmentPair {
                        query: qs..q,
                        target: hs..h,
                    });
                }
                if !q_gap {
                    q += 1;
                }
                if !h_gap {
                    h += 1;
                }
            }
        }
    }
    if let Some((qs, hs)) = open {
        blocks.push(SegmentPair {
            query: qs..q,
            target: hs..h,
        });
    }
    blocks
}

fn text_of<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.descendants()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::trim)
}

fn number<T: std::str::FromStr>(node: Node, tag: &str) -> Result<T> {
    let value = text_of(node, tag).unwrap_or_default();
    value.parse().map_err(|_| Error::ReportValue {
        field: tag.to_string(),
        value: value.to_string(),
    })
}
