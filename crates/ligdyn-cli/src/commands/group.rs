use ligdyn_aggregate::{analyse_group, CONTACT_FRACTION_CSV, CORRELATION_CSV, GROUP_CSV};
use std::path::PathBuf;

pub fn execute(results: Vec<PathBuf>, group_dir: PathBuf) -> anyhow::Result<()> {
    let group = analyse_group(&results, &group_dir)?;
    println!(
        "{} simulations, {} contact fraction tables",
        results.len(),
        group.contact_fractions.len()
    );
    let mut outputs = vec![GROUP_CSV, CONTACT_FRACTION_CSV];
    match &group.correlations {
        Some(rows) => {
            println!("{} correlations", rows.len());
            outputs.push(CORRELATION_CSV);
        }
        None => log::warn!("no covariate column; correlations skipped"),
    }
    for output in outputs {
        println!("{}", group_dir.join(output).display());
    }
    Ok(())
}
