//! PLIP XML report parsing.
//!
//! PLIP writes one subdirectory per input frame (`frame{N}/report.xml`). Each
//! `<bindingsite>` names one ligand and lists its contacts grouped by category.
use crate::error::{Error, Result};
use crate::interaction::{InteractionRecord, InteractionType};
use crate::ligand::{LigandCandidate, LigandCatalog};
use roxmltree::{Document, Node};
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "report.xml";

/// Everything read from one detector output directory.
#[derive(Debug, Clone, Default)]
pub struct ParsedReports {
    pub interactions: Vec<InteractionRecord>,
    pub ligands: LigandCatalog,
    /// Number of report directories read.
    pub reports: usize,
}

/// Report subdirectories of `outdir` with their frame index, ordered by path
/// length and then lexicographically so `frame2` precedes `frame10`.
pub fn report_dirs(outdir: &Path) -> Result<Vec<(usize, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(outdir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        dirs.push(path);
    }
    dirs.sort_by(|a, b| {
        let (a, b) = (a.to_string_lossy(), b.to_string_lossy());
        a.len().cmp(&b.len()).then_with(|| a.cmp(&b))
    });
    dirs.into_iter()
        .map(|dir| Ok((frame_index(&dir)?, dir)))
        .collect()
}

/// Frame number taken from the trailing digits of the directory name.
pub fn frame_index(dir: &Path) -> Result<usize> {
    let name = dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidFrameDir(dir.to_path_buf()))?;
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    name[name.len() - digits..]
        .parse()
        .map_err(|_| Error::InvalidFrameDir(dir.to_path_buf()))
}

/// Reads every report under `outdir`.
pub fn parse_report_dir(outdir: &Path) -> Result<ParsedReports> {
    let mut parsed = ParsedReports::default();
    for (frame, dir) in report_dirs(outdir)? {
        let path = dir.join(REPORT_FILE);
        let text = fs::read_to_string(&path)?;
        parse_report(&path, &text, frame, &mut parsed.interactions, &mut parsed.ligands)?;
        parsed.reports += 1;
    }
    log::info!(
        "parsed {} reports: {} interactions, {} ligands",
        parsed.reports,
        parsed.interactions.len(),
        parsed.ligands.len()
    );
    Ok(parsed)
}

/// Parses one report, appending its contacts and registering its ligands.
///
/// `path` is used for error messages only.
pub fn parse_report(
    path: &Path,
    text: &str,
    frame: usize,
    records: &mut Vec<InteractionRecord>,
    ligands: &mut LigandCatalog,
) -> Result<()> {
    let doc = Document::parse(text).map_err(|source| Error::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    let fields = Fields { path };

    for site in doc.root_element().children().filter(|n| n.has_tag_name("bindingsite")) {
        if site.attribute("has_interactions") == Some("False") {
            continue;
        }
        let identifiers = fields.child(site, "identifiers")?;
        ligands.observe(LigandCandidate {
            inchikey: fields.text(identifiers, "inchikey")?,
            name: fields.text(identifiers, "longname")?,
            ligtype: fields.text(identifiers, "ligtype")?,
            smiles: fields.optional_text(identifiers, "smiles"),
            frames_seen: 0,
        });

        let interactions = fields.child(site, "interactions")?;
        for category in interactions.children().filter(Node::is_element) {
            let key = category.tag_name().name();
            let interaction_type =
                InteractionType::from_report_key(key).ok_or_else(|| Error::UnknownInteractionType {
                    path: path.to_path_buf(),
                    key: key.to_string(),
                })?;
            for contact in category.children().filter(Node::is_element) {
                records.push(InteractionRecord {
                    frame,
                    interaction_type,
                    residue_chain: fields.text(contact, "reschain")?,
                    residue_name: fields.text(contact, "restype")?,
                    residue_number: fields.number(contact, "resnr")?,
                    ligand_chain: fields.text(contact, "reschain_lig")?,
                    ligand_name: fields.text(contact, "restype_lig")?,
                    ligand_number: fields.number(contact, "resnr_lig")?,
                });
            }
        }
    }
    Ok(())
}

struct Fields<'p> {
    path: &'p Path,
}

impl Fields<'_> {
    fn child<'a, 'input>(&self, node: Node<'a, 'input>, field: &str) -> Result<Node<'a, 'input>> {
        node.children()
            .find(|n| n.has_tag_name(field))
            .ok_or_else(|| Error::MissingField {
                path: self.path.to_path_buf(),
                field: field.to_string(),
            })
    }

    fn text(&self, node: Node, field: &str) -> Result<String> {
        Ok(self.child(node, field)?.text().unwrap_or_default().trim().to_string())
    }

    fn optional_text(&self, node: Node, field: &str) -> String {
        self.text(node, field).unwrap_or_default()
    }

    fn number(&self, node: Node, field: &str) -> Result<i32> {
        let value = self.text(node, field)?;
        value.parse().map_err(|_| Error::InvalidValue {
            path: self.path.to_path_buf(),
            field: field.to_string(),
            value,
        })
    }
}
