//! Per-chain residue sequences.
use crate::info::constants::aa3to1;
use crate::AtomCollection;

/// A residue identified the way contact reports identify it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedResidue {
    pub chain: String,
    pub res_name: String,
    pub res_id: i32,
}

/// The amino-acid residues of one chain, in ascending residue number.
///
/// `residues[i]` is the residue behind `sequence[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSequence {
    pub chain: String,
    pub sequence: String,
    pub residues: Vec<NamedResidue>,
}

impl AtomCollection {
    /// Sequences for every chain holding at least one amino acid with a CA atom.
    ///
    /// Unknown residues map to `X`. Residue names should be normalised first so
    /// protonation variants resolve to their standard code.
    pub fn chain_sequences(&self) -> Vec<ChainSequence> {
        let mut chains: Vec<ChainSequence> = Vec::new();
        for residue in self.iter_residues_aminoacid() {
            if !residue.has_alpha_carbon() {
                continue;
            }
            let named = NamedResidue {
                chain: residue.chain_id.clone(),
                res_name: residue.res_name.clone(),
                res_id: residue.res_id,
            };
            match chains.iter_mut().find(|c| c.chain == residue.chain_id) {
                Some(chain) => chain.residues.push(named),
                None => chains.push(ChainSequence {
                    chain: residue.chain_id.clone(),
                    sequence: String::new(),
                    residues: vec![named],
                }),
            }
        }
        for chain in chains.iter_mut() {
            chain.residues.sort_by_key(|r| r.res_id);
            chain.residues.dedup();
            chain.sequence = chain.residues.iter().map(|r| aa3to1(&r.res_name)).collect();
        }
        chains
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utilities::get_atom_container;

    #[test]
    fn test_chain_sequences() {
        let mut ac = get_atom_container();
        let raw = ac.chain_sequences();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].sequence, "MSXLDG");

        ac.normalize_residue_names();
        let chains = ac.chain_sequences();
        assert_eq!(chains[0].chain, "A");
        assert_eq!(chains[0].sequence, "MSHLDG");
        assert_eq!(chains[0].residues.len(), 6);
        assert_eq!(chains[0].residues[2].res_name, "HIS");
        assert_eq!(chains[0].residues[2].res_id, 3);
    }
}
