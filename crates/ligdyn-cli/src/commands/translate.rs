use ligdyn_align::{
    translate_chains, Blastp, CachedResidueSource, DirectoryCache, GpcrdbClient, MemoryCache, ResidueSource,
};
use ligdyn_core::load_topology;
use ligdyn_pipeline::PipelineConfig;
use std::path::PathBuf;

/// Prints `chain,residue,number,label` for every translated residue.
pub fn execute(topology: PathBuf, config: PipelineConfig) -> anyhow::Result<()> {
    let mut topology = load_topology(&topology)?;
    topology.atoms.normalize_residue_names();
    let chains = topology.atoms.chain_sequences();

    let search = Blastp::new(&config.blastp, &config.blast_db);
    let client = GpcrdbClient::new(config.metadata_endpoint.clone())?;
    let residues: Box<dyn ResidueSource> = match &config.cache_dir {
        Some(dir) => Box::new(CachedResidueSource::new(client, DirectoryCache::new(dir)?)),
        None => Box::new(CachedResidueSource::new(client, MemoryCache::new())),
    };
    let translation = translate_chains(&chains, &search, residues.as_ref());

    println!("chain,residue,number,label");
    for chain in &chains {
        for residue in &chain.residues {
            if let Some(label) = translation.residues.get(&residue.chain, &residue.res_name, residue.res_id) {
                println!("{},{},{},{label}", residue.chain, residue.res_name, residue.res_id);
            }
        }
    }
    Ok(())
}
