//! One simulation, end to end.
//!
//! frames → detector → reports → alignment → `interactions.csv`,
//! `ligands.csv` and `run_data.json` in the results directory.
use crate::config::PipelineConfig;
use crate::detector::Detector;
use crate::error::Result;
use crate::tasks::{TaskId, TaskQueue};
use ligdyn_align::{
    translate_chains, Blastp, CachedResidueSource, DirectoryCache, GpcrdbClient, MemoryCache, ResidueSource,
    SequenceSearch,
};
use ligdyn_core::{load_topology, Frame, FrameExtractor, TrajectorySource};
use ligdyn_io::summary::RUN_SUMMARY_JSON;
use ligdyn_io::tables::{interactions_frame, ligands_frame, write_csv, INTERACTIONS_CSV, LIGANDS_CSV};
use ligdyn_io::{frame_interaction_counts, parse_report_dir, AlignmentScore, CompoundNames, RunSummary};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const FRAMES_DIR: &str = "frames";
pub const REPORTS_DIR: &str = "plip";

/// What to analyse and where to put the results.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub name: String,
    pub source: TrajectorySource,
    /// Trajectory-relative frame indices; `None` analyses every frame.
    pub frames: Option<Vec<usize>>,
    pub results_dir: PathBuf,
}

impl RunRequest {
    pub fn frames(&self) -> Vec<usize> {
        match &self.frames {
            Some(frames) => frames.clone(),
            None => (0..self.source.frame_count()).collect(),
        }
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.results_dir.join(REPORTS_DIR)
    }
}

pub type SharedSearch = Box<dyn SequenceSearch + Send + Sync>;
pub type SharedResidues = Box<dyn ResidueSource + Send + Sync>;

pub struct Pipeline {
    config: PipelineConfig,
    search: SharedSearch,
    residues: SharedResidues,
    compounds: CompoundNames,
}

impl Pipeline {
    /// Builds the default backends: `blastp`, GPCRdb and the configured cache.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let search = Box::new(Blastp::new(&config.blastp, &config.blast_db));
        let client = GpcrdbClient::new(config.metadata_endpoint.clone())?;
        let residues: SharedResidues = match &config.cache_dir {
            Some(dir) => Box::new(CachedResidueSource::new(client, DirectoryCache::new(dir)?)),
            None => Box::new(CachedResidueSource::new(client, MemoryCache::new())),
        };
        let compounds = CompoundNames::load(config.compound_names.as_deref(), config.compound_ids.as_deref())?;
        Ok(Self::with_backends(config, search, residues, compounds))
    }

    pub fn with_backends(
        config: PipelineConfig,
        search: SharedSearch,
        residues: SharedResidues,
        compounds: CompoundNames,
    ) -> Self {
        Pipeline {
            config,
            search,
            residues,
            compounds,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extracts frames and runs the detector; the frame files are removed afterwards.
    ///
    /// Reports left in the reports directory by an earlier run are deleted first.
    pub fn detect(&self, request: &RunRequest) -> Result<Vec<Frame>> {
        let frames_dir = request.results_dir.join(FRAMES_DIR);
        let reports_dir = request.reports_dir();
        if reports_dir.exists() {
            log::info!("clearing stale reports in {}", reports_dir.display());
            fs::remove_dir_all(&reports_dir)?;
        }
        let frames = FrameExtractor::new(&request.source)
            .with_cutoff(self.config.cutoff)
            .extract(&request.frames(), &frames_dir)?;

        let detector = Detector::new(self.config.detector_command.clone(), self.config.workers)?;
        let files: Vec<PathBuf> = frames.iter().map(|frame| frame.path.clone()).collect();
        let outcome = detector.run(&files, &reports_dir);
        if let Err(e) = fs::remove_dir_all(&frames_dir) {
            log::warn!("could not remove {}: {e}", frames_dir.display());
        }
        outcome?;
        Ok(frames)
    }

    /// Runs every stage and writes the result artifacts.
    ///
    /// The reports are deleted once they have been parsed.
    pub fn run(&self, request: &RunRequest) -> Result<RunSummary> {
        log::info!("starting analysis of {}", request.name);
        fs::create_dir_all(&request.results_dir)?;
        let stale_summary = request.results_dir.join(RUN_SUMMARY_JSON);
        if stale_summary.exists() {
            fs::remove_file(&stale_summary)?;
        }
        let frames = self.detect(request)?;
        let summary = self.collect(request, frames.len())?;
        fs::remove_dir_all(request.reports_dir())?;
        Ok(summary)
    }

    /// Parses the reports of a finished detection and writes the result artifacts.
    pub fn collect(&self, request: &RunRequest, frame_count: usize) -> Result<RunSummary> {
        let parsed = parse_report_dir(&request.reports_dir())?;
        let ligands: Vec<_> = parsed
            .ligands
            .retained(frame_count, self.config.ligand_threshold)
            .iter()
            .map(|ligand| self.compounds.enrich(ligand))
            .collect();

        let mut topology = load_topology(request.source.topology())?;
        topology.atoms.normalize_residue_names();
        let chains = topology.atoms.chain_sequences();
        let translation = translate_chains(&chains, self.search.as_ref(), self.residues.as_ref());
        if translation.residues.is_empty() {
            log::warn!("{}: no residues could be translated", request.name);
        }

        let results = &request.results_dir;
        let mut interactions = interactions_frame(&parsed.interactions, |record| {
            translation
                .residues
                .get(&record.residue_chain, &record.residue_name, record.residue_number)
                .map(str::to_string)
        })?;
        write_csv(&mut interactions, &results.join(INTERACTIONS_CSV))?;
        write_csv(&mut ligands_frame(&ligands)?, &results.join(LIGANDS_CSV))?;

        let mut summary = RunSummary::new(request.name.clone(), frame_count);
        summary.alignment_scores = translation
            .alignments
            .iter()
            .map(|(chain, alignment)| {
                let score = AlignmentScore {
                    entry_name: alignment.hit.entry_name.clone(),
                    accession: alignment.hit.accession.clone(),
                    evalue: alignment.evalue,
                    identity: alignment.identity,
                };
                (chain.clone(), score)
            })
            .collect();
        summary.ligands = ligands;
        summary.interaction_counts = frame_interaction_counts(&parsed.interactions);
        summary.save(&results.join(RUN_SUMMARY_JSON))?;

        log::info!(
            "finished {}: {} interactions, {} ligands",
            request.name,
            parsed.interactions.len(),
            summary.ligands.len()
        );
        Ok(summary)
    }

    /// Queues `request` under its simulation name.
    pub fn submit(self: &Arc<Self>, queue: &dyn TaskQueue, request: RunRequest) -> TaskId {
        let pipeline = Arc::clone(self);
        let key = request.name.clone();
        queue.submit(&key, Box::new(move || pipeline.run(&request).map(|_| ())))
    }
}

/// Results directory of simulation `name` under `root`.
pub fn results_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}
