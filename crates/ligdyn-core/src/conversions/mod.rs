mod pdb;

pub use pdb::write_pdb;
