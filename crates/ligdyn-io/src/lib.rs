//! Reading detector reports and writing per-simulation artifacts.
//!
//! PLIP reports are parsed into [`InteractionRecord`]s and a [`LigandCatalog`];
//! results are stored as CSV tables plus a JSON [`RunSummary`].
mod error;
mod interaction;
mod ligand;
pub mod report;
pub mod summary;
pub mod tables;

pub use error::{Error, Result};
pub use interaction::{InteractionRecord, InteractionType};
pub use ligand::{CompoundNames, LigandCandidate, LigandCatalog, LigandEntry, LIGAND_DETECTION_THRESHOLD};
pub use report::{parse_report_dir, ParsedReports};
pub use summary::{frame_interaction_counts, AlignmentScore, RunSummary};
pub use tables::AnnotatedInteraction;
