use super::commands;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ligdyn_pipeline::PipelineConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the pipeline configuration file.
#[derive(Args, Debug)]
pub struct Settings {
    /// JSON configuration file
    #[arg(long, env = "LIGDYN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Number of detector processes
    #[arg(long, env = "LIGDYN_WORKERS", global = true)]
    workers: Option<usize>,

    /// Detector command line; frame files are appended
    #[arg(long, env = "LIGDYN_DETECTOR", global = true)]
    detector: Option<String>,

    #[arg(long, env = "LIGDYN_BLASTP", global = true)]
    blastp: Option<PathBuf>,

    #[arg(long, env = "LIGDYN_BLAST_DB", global = true)]
    blast_db: Option<PathBuf>,

    /// Directory caching residue metadata between runs
    #[arg(long, env = "LIGDYN_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// InChIKey to compound name table (JSON)
    #[arg(long, env = "LIGDYN_COMPOUND_NAMES", global = true)]
    compound_names: Option<PathBuf>,

    /// InChIKey to ChEBI id table (JSON)
    #[arg(long, env = "LIGDYN_COMPOUND_IDS", global = true)]
    compound_ids: Option<PathBuf>,

    /// Fraction of frames a ligand must appear in
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Protein shell radius in Angstrom
    #[arg(long, global = true)]
    cutoff: Option<f32>,
}

impl Settings {
    pub fn resolve(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(detector) = &self.detector {
            config.detector_command = detector.split_whitespace().map(String::from).collect();
        }
        if let Some(blastp) = &self.blastp {
            config.blastp = blastp.clone();
        }
        if let Some(db) = &self.blast_db {
            config.blast_db = db.clone();
        }
        if self.cache_dir.is_some() {
            config.cache_dir = self.cache_dir.clone();
        }
        if self.compound_names.is_some() {
            config.compound_names = self.compound_names.clone();
        }
        if self.compound_ids.is_some() {
            config.compound_ids = self.compound_ids.clone();
        }
        if let Some(threshold) = self.threshold {
            config.ligand_threshold = threshold;
        }
        if let Some(cutoff) = self.cutoff {
            config.cutoff = cutoff;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Directory holding a topology and a trajectory
    #[arg(short, long, conflicts_with_all = ["topology", "trajectory"])]
    pub input: Option<PathBuf>,

    #[arg(long, requires = "trajectory")]
    pub topology: Option<PathBuf>,

    #[arg(long, requires = "topology")]
    pub trajectory: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the number of trajectory frames
    Count {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write the protein shell of selected frames as PDB files
    Frames {
        #[command(flatten)]
        source: SourceArgs,
        /// Trajectory-relative frame indices; all frames when omitted
        #[arg(short, long, value_delimiter = ',')]
        frames: Vec<usize>,
        #[arg(short, long)]
        outdir: PathBuf,
    },
    /// Run the contact detector over a directory of frame files
    Detect {
        #[arg(long)]
        frames_dir: PathBuf,
        #[arg(short, long)]
        outdir: PathBuf,
    },
    /// Parse detector reports into interaction and ligand tables
    Parse {
        #[arg(short, long)]
        reports: PathBuf,
        /// Number of analysed frames, for the ligand threshold
        #[arg(long)]
        frame_count: usize,
        #[arg(short, long)]
        outdir: PathBuf,
    },
    /// Align protein chains and print their reference numbering
    Translate {
        #[arg(long)]
        topology: PathBuf,
    },
    /// Analyse one simulation end to end
    Run {
        #[command(flatten)]
        source: SourceArgs,
        /// Simulation id; defaults to the results directory name
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long, value_delimiter = ',')]
        frames: Vec<usize>,
        #[arg(short, long)]
        results_dir: PathBuf,
    },
    /// Show the status of a simulation's results directory
    Status {
        #[arg(short, long)]
        results_dir: PathBuf,
        /// Frames requested for the run
        #[arg(long)]
        frame_count: usize,
    },
    /// Aggregate several simulations against the group's experimental data
    Group {
        /// Results directories, one per simulation
        #[arg(short, long, num_args = 1.., required = true)]
        results: Vec<PathBuf>,
        /// Directory holding exp_data.csv; outputs are written here
        #[arg(short, long)]
        group_dir: PathBuf,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        let settings = &self.settings;
        match self.command {
            Commands::Count { source } => commands::frames::count(&source),
            Commands::Frames { source, frames, outdir } => {
                commands::frames::execute(&source, frames, outdir, settings.resolve()?)
            }
            Commands::Detect { frames_dir, outdir } => {
                commands::detect::execute(frames_dir, outdir, settings.resolve()?)
            }
            Commands::Parse {
                reports,
                frame_count,
                outdir,
            } => commands::parse::execute(reports, frame_count, outdir, settings.resolve()?),
            Commands::Translate { topology } => commands::translate::execute(topology, settings.resolve()?),
            Commands::Run {
                source,
                name,
                frames,
                results_dir,
            } => commands::run::execute(&source, name, frames, results_dir, settings.resolve()?),
            Commands::Status {
                results_dir,
                frame_count,
            } => commands::run::status(results_dir, frame_count),
            Commands::Group { results, group_dir } => commands::group::execute(results, group_dir),
        }
    }
}
