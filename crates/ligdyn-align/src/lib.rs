//! Sequence alignment and reference residue numbering.
//!
//! Each protein chain is searched against a reference database; the best hit's
//! residue metadata then labels every aligned residue with its generic number.
mod cache;
mod error;
mod intervals;
mod metadata;
mod search;
mod translate;

pub use cache::{CachedResidueSource, DirectoryCache, MemoryCache, ResidueCache};
pub use error::{Error, Result};
pub use intervals::IntervalMap;
pub use metadata::{AlternativeNumber, GpcrdbClient, ResidueRecord, ResidueSource, GPCRDB_RESIDUES_ENDPOINT};
pub use search::{parse_blast_xml, AlignmentResult, Blastp, HitId, SegmentPair, SequenceSearch};
pub use translate::{translate_chain, translate_chains, ChainTranslation, ResidueTranslation, Translation};
