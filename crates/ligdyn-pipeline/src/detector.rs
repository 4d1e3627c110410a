//! Sharded contact detection with external PLIP processes.
//!
//! Frame files are dealt round-robin to `workers` shards and each non-empty
//! shard becomes one detector process. Every process writes into the same
//! output directory; report subdirectories are named after the frame file, so
//! shards never collide.
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread;

#[derive(Debug, Clone)]
pub struct Detector {
    command: Vec<String>,
    workers: usize,
}

impl Detector {
    pub fn new(command: Vec<String>, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        if command.is_empty() {
            return Err(Error::Config("detector command is empty".to_string()));
        }
        Ok(Detector { command, workers })
    }

    /// Shard `i` holds every file whose index is `i` modulo the worker count.
    /// Empty shards are left out.
    pub fn shards<'a>(&self, files: &'a [PathBuf]) -> Vec<Vec<&'a Path>> {
        let mut shards = vec![Vec::new(); self.workers];
        for (i, file) in files.iter().enumerate() {
            shards[i % self.workers].push(file.as_path());
        }
        shards.retain(|shard| !shard.is_empty());
        shards
    }

    /// Runs one process per shard with `outdir` as working directory and waits
    /// for all of them. Fails if any process could not start or exited non-zero.
    pub fn run(&self, files: &[PathBuf], outdir: &Path) -> Result<()> {
        fs::create_dir_all(outdir)?;
        let files = files
            .iter()
            .map(fs::canonicalize)
            .collect::<std::io::Result<Vec<_>>>()?;
        let shards = self.shards(&files);

        let outcomes: Vec<std::io::Result<Output>> = thread::scope(|scope| {
            let handles: Vec<_> = shards
                .iter()
                .enumerate()
                .map(|(shard, frames)| {
                    log::info!("starting detector worker {shard} with {} frames", frames.len());
                    let mut command = Command::new(&self.command[0]);
                    command
                        .args(&self.command[1..])
                        .args(frames)
                        .current_dir(outdir);
                    scope.spawn(move || command.output())
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(std::io::Error::other("worker thread panicked")))
                })
                .collect()
        });

        let mut failure = None;
        for (shard, outcome) in outcomes.into_iter().enumerate() {
            let details = match outcome {
                Ok(output) => {
                    log::debug!("worker {shard} stdout: {}", String::from_utf8_lossy(&output.stdout));
                    log::debug!("worker {shard} stderr: {}", String::from_utf8_lossy(&output.stderr));
                    if output.status.success() {
                        continue;
                    }
                    format!("{}", output.status)
                }
                Err(e) => e.to_string(),
            };
            log::error!("detector worker {shard} failed: {details}");
            failure.get_or_insert(Error::Worker { shard, details });
        }
        match failure {
            Some(error) => Err(error),
            None => {
                log::info!("detection done");
                Ok(())
            }
        }
    }
}

/// Number of report subdirectories written so far.
pub fn progress(outdir: &Path) -> usize {
    fs::read_dir(outdir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A detector command running `body` through `sh`.
    pub(crate) fn script(dir: &Path, name: &str, body: &str) -> Vec<String> {
        let path = dir.join(name);
        fs::write(&path, format!("{body}\n")).unwrap();
        vec!["sh".to_string(), path.display().to_string()]
    }

    fn frame_files(dir: &Path, n: usize) -> Vec<PathBuf> {
        (0..n)
            .map(|i| {
                let path = dir.join(format!("frame{i}.pdb"));
                fs::write(&path, "END\n").unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_round_robin_shards() {
        let detector = Detector::new(vec!["plip".to_string()], 3).unwrap();
        let files: Vec<PathBuf> = (0..7).map(|i| PathBuf::from(format!("f{i}"))).collect();
        let shards = detector.shards(&files);
        let names: Vec<Vec<String>> = shards
            .iter()
            .map(|s| s.iter().map(|p| p.display().to_string()).collect())
            .collect();
        assert_eq!(names, vec![vec!["f0", "f3", "f6"], vec!["f1", "f4"], vec!["f2", "f5"]]);

        let wide = Detector::new(vec!["plip".to_string()], 5).unwrap();
        assert_eq!(wide.shards(&files[..2]).len(), 2);
        assert!(matches!(Detector::new(vec!["plip".to_string()], 0), Err(Error::Config(_))));
    }

    #[test]
    fn test_run_writes_into_outdir() {
        let dir = tempfile::tempdir().unwrap();
        let frames = frame_files(dir.path(), 5);
        let fake = script(
            dir.path(),
            "fake_plip.sh",
            r#"for f in "$@"; do n=$(basename "$f" .pdb); mkdir -p "$n"; echo "<report/>" > "$n/report.xml"; done"#,
        );
        let outdir = dir.path().join("plip");
        let detector = Detector::new(fake, 2).unwrap();
        detector.run(&frames, &outdir).unwrap();

        assert_eq!(progress(&outdir), 5);
        assert!(outdir.join("frame4/report.xml").is_file());
    }

    #[test]
    fn test_any_failure_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let frames = frame_files(dir.path(), 4);
        // only the shard holding frame1 fails
        let fake = script(
            dir.path(),
            "flaky_plip.sh",
            r#"for f in "$@"; do case "$f" in *frame1.pdb) exit 3;; esac; done; exit 0"#,
        );
        let detector = Detector::new(fake, 2).unwrap();
        let err = detector.run(&frames, &dir.path().join("plip")).unwrap_err();
        assert!(matches!(err, Error::Worker { shard: 1, .. }));

        let missing = Detector::new(vec!["/nonexistent/plip".to_string()], 2).unwrap();
        assert!(matches!(
            missing.run(&frames, &dir.path().join("plip")),
            Err(Error::Worker { shard: 0, .. })
        ));
    }

    #[test]
    fn test_progress_missing_dir() {
        assert_eq!(progress(Path::new("/nonexistent/plip")), 0);
    }
}
