//! # ligdyn-core
//!
//! Structure and trajectory handling for ligand contact analysis.
//!
//! __ligdyn-core__ provides functionality for:
//! * Reading PDB/mmCIF topologies and multi-model PDB or DCD trajectories
//! * Normalising water and protonation-variant residue names
//! * Selecting the protein, its 7 Å shell and whole molecular fragments
//! * Writing one filtered PDB file per requested frame
//! * Deriving per-chain one-letter sequences
//!
//! The main entry point is the [`AtomCollection`] struct, a columnar view of one
//! topology whose coordinates are swapped frame by frame, together with the
//! [`FrameExtractor`] that drives a [`TrajectorySource`].
//!
mod atomcollection;
mod bonds;
mod conversions;
mod error;
mod frames;
pub mod info;
mod residue;
mod selection;
mod sequence;
mod spatial;
mod structure;
pub mod trajectory;

#[cfg(test)]
mod test_utilities;

pub use self::atomcollection::AtomCollection;
pub use self::bonds::Bond;
pub use self::conversions::write_pdb;
pub use self::error::{Error, Result};
pub use self::frames::{select_contact_shell, Frame, FrameExtractor, CONTACT_CUTOFF};
pub use self::residue::ResidueAtoms;
pub use self::selection::{AtomRef, AtomSelector, AtomView, Selection};
pub use self::sequence::{ChainSequence, NamedResidue};
pub use self::structure::{frame_count, load_topology, Topology, TrajectorySource};
