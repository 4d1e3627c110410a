use ligdyn_io::tables::{interactions_frame, ligands_frame, write_csv, INTERACTIONS_CSV, LIGANDS_CSV};
use ligdyn_io::{parse_report_dir, CompoundNames};
use ligdyn_pipeline::PipelineConfig;
use std::fs;
use std::path::PathBuf;

pub fn execute(reports: PathBuf, frame_count: usize, outdir: PathBuf, config: PipelineConfig) -> anyhow::Result<()> {
    let parsed = parse_report_dir(&reports)?;
    let compounds = CompoundNames::load(config.compound_names.as_deref(), config.compound_ids.as_deref())?;
    let ligands: Vec<_> = parsed
        .ligands
        .retained(frame_count, config.ligand_threshold)
        .iter()
        .map(|ligand| compounds.enrich(ligand))
        .collect();

    fs::create_dir_all(&outdir)?;
    let mut interactions = interactions_frame(&parsed.interactions, |_| None)?;
    write_csv(&mut interactions, &outdir.join(INTERACTIONS_CSV))?;
    write_csv(&mut ligands_frame(&ligands)?, &outdir.join(LIGANDS_CSV))?;

    println!(
        "{} reports, {} interactions, {} of {} ligands kept",
        parsed.reports,
        parsed.interactions.len(),
        ligands.len(),
        parsed.ligands.len()
    );
    Ok(())
}
