use crate::AtomCollection;
use ligdyn_test_data::TestFile;

pub(crate) fn get_atom_container() -> AtomCollection {
    let (file_path, _handle) = TestFile::complex_topology().create_temp().unwrap();
    let (pdb, _errors) = pdbtbx::open(file_path).unwrap();
    AtomCollection::from(&pdb)
}
