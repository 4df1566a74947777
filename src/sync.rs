// Folder synchronizer: copies wallpaper-sized cache images into the destination
use crate::domain::{discover_candidates, is_wallpaper, Candidate, DestinationSnapshot};
use crate::error::{Result, SaverError};
use crate::probe::{ImageProbe, Probe, ProbeResult};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// JPEG quality used when re-encoding wallpapers
pub const JPEG_QUALITY: u8 = 100;

/// Suffix of the temporary file a wallpaper is encoded into before it is
/// renamed to its final name
const PARTIAL_SUFFIX: &str = "part";

/// Counters for one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Candidate files found in the source directory
    pub scanned: usize,
    /// Candidates that did not decode as images
    pub not_images: usize,
    /// Candidates that could not be read at all
    pub unreadable: usize,
    /// Decoded images that failed the wallpaper heuristic
    pub rejected: usize,
    /// Wallpapers skipped because their output already exists
    pub already_present: usize,
    /// Output files written during this run
    pub written: Vec<PathBuf>,
    /// Wallpapers whose write failed
    pub failed: usize,
}

impl SyncReport {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}

/// Runs discovery, classification and write-out between a source cache
/// directory and a destination folder.
#[derive(Debug, Clone)]
pub struct FolderSynchronizer<P = ImageProbe> {
    probe: Arc<P>,
}

impl FolderSynchronizer<ImageProbe> {
    pub fn new() -> Self {
        Self::with_probe(ImageProbe::new())
    }
}

impl Default for FolderSynchronizer<ImageProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Probe + 'static> FolderSynchronizer<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe: Arc::new(probe),
        }
    }

    /// Performs one sync run.
    ///
    /// Only directory-level faults are returned as errors. Per-candidate
    /// read or write failures are logged, counted in the report, and retried
    /// on the next run.
    pub async fn sync(&self, destination_dir: &Path, source_dir: &Path) -> Result<SyncReport> {
        let (snapshot, candidates) = {
            let destination_dir = destination_dir.to_path_buf();
            let source_dir = source_dir.to_path_buf();
            tokio::task::spawn_blocking(move || -> Result<_> {
                let snapshot = DestinationSnapshot::capture(&destination_dir)?;
                let candidates = discover_candidates(&source_dir)?;
                Ok((snapshot, candidates))
            })
            .await
            .map_err(join_failure)??
        };

        let mut report = SyncReport {
            scanned: candidates.len(),
            ..SyncReport::default()
        };
        debug!(
            "sync: {} candidates in {}, {} entries already in {}",
            candidates.len(),
            source_dir.display(),
            snapshot.len(),
            destination_dir.display()
        );

        let mut probes = JoinSet::new();
        for candidate in candidates {
            let probe = Arc::clone(&self.probe);
            probes.spawn_blocking(move || {
                let outcome = probe.probe(&candidate.path);
                (candidate, outcome)
            });
        }

        let mut outcomes: HashMap<OsString, (Candidate, Result<ProbeResult>)> = HashMap::new();
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((candidate, outcome)) => {
                    outcomes.insert(candidate.name.clone(), (candidate, outcome));
                }
                Err(e) => {
                    warn!("sync: probe task failed: {e}");
                    report.unreadable += 1;
                }
            }
        }

        let mut outcomes: Vec<_> = outcomes.into_values().collect();
        outcomes.sort_by(|a, b| a.0.name.cmp(&b.0.name));

        let mut pending = Vec::new();
        for (candidate, outcome) in outcomes {
            let name = candidate.name.to_string_lossy();
            match outcome {
                Err(e) => {
                    warn!("sync: skipping {name}: {e}");
                    report.unreadable += 1;
                }
                Ok(ProbeResult::NotAnImage) => {
                    debug!("sync: {name} is not an image");
                    report.not_images += 1;
                }
                Ok(ProbeResult::Decoded {
                    width,
                    height,
                    image,
                }) => {
                    if !is_wallpaper(width, height) {
                        debug!("sync: {name} ({width}x{height}) is not wallpaper sized");
                        report.rejected += 1;
                        continue;
                    }

                    let target = candidate.output_name();
                    if snapshot.contains(&target) {
                        debug!("sync: {} already saved", target.to_string_lossy());
                        report.already_present += 1;
                        continue;
                    }

                    pending.push((destination_dir.join(target), image));
                }
            }
        }

        let mut writes = JoinSet::new();
        for (path, image) in pending {
            writes.spawn_blocking(move || write_jpeg(&path, &image).map(|_| path));
        }

        while let Some(joined) = writes.join_next().await {
            match joined.map_err(join_failure).and_then(|written| written) {
                Ok(path) => {
                    info!("found a wallpaper image: {}", path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    warn!("sync: {e}");
                    report.failed += 1;
                }
            }
        }
        report.written.sort();

        info!(
            "sync: scanned {}, saved {}, already saved {}, skipped {} non-images and {} small images, {} failures",
            report.scanned,
            report.written_count(),
            report.already_present,
            report.not_images,
            report.rejected,
            report.unreadable + report.failed
        );

        Ok(report)
    }
}

fn join_failure(e: JoinError) -> SaverError {
    SaverError::Io(io::Error::other(format!("background task failed: {}", e)))
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

/// Encodes `image` as JPEG at `path`.
///
/// The data is written to a sibling `.part` file first and renamed into
/// place, so `path` only ever appears with complete contents.
pub fn write_jpeg(path: &Path, image: &DynamicImage) -> Result<()> {
    let partial = partial_path(path);

    let outcome = encode_jpeg(&partial, image).and_then(|_| fs::rename(&partial, path));
    if let Err(e) = outcome {
        fs::remove_file(&partial).ok();
        return Err(SaverError::CandidateWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    Ok(())
}

fn encode_jpeg(path: &Path, image: &DynamicImage) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder
        .encode_image(&image.to_rgb8())
        .map_err(io::Error::other)?;

    writer.flush()
}
