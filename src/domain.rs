use crate::error::{Result, SaverError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension given to every image written to the destination
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Images must be strictly wider than this (in pixels) to count as wallpapers
pub const MIN_WALLPAPER_WIDTH: u32 = 1000;

/// Wallpaper heuristic: landscape orientation and wider than
/// [`MIN_WALLPAPER_WIDTH`]. Small previews and icons live in the same cache
/// directory and fail one of the two checks.
pub fn is_wallpaper(width: u32, height: u32) -> bool {
    height < width && width > MIN_WALLPAPER_WIDTH
}

/// Name of the output file derived from a candidate's file name.
///
/// Cache file names are opaque, so they are kept as raw OS strings.
pub fn output_name(candidate_name: &OsStr) -> OsString {
    let mut name = candidate_name.to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    name
}

/// An unidentified file in the source cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub name: OsString,
}

impl Candidate {
    pub fn new(source_dir: &Path, name: impl Into<OsString>) -> Self {
        let name = name.into();
        Self {
            path: source_dir.join(&name),
            name,
        }
    }

    pub fn output_name(&self) -> OsString {
        output_name(&self.name)
    }
}

/// Lists the names of the regular files in `dir_path`.
///
/// Entries that cannot be inspected are skipped. Fails only when the
/// directory itself cannot be read.
pub fn list_file_names(dir_path: &Path) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();

    for entry_result in fs::read_dir(dir_path)? {
        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();
        match fs::metadata(&path) {
            Ok(m) if m.is_file() => names.push(entry.file_name()),
            _ => continue,
        }
    }

    names.sort();
    Ok(names)
}

/// Lists the candidate files of one scan pass over the source directory.
pub fn discover_candidates(source_dir: &Path) -> Result<Vec<Candidate>> {
    let names = list_file_names(source_dir).map_err(|source| SaverError::SourceUnreadable {
        path: source_dir.to_path_buf(),
        source,
    })?;

    Ok(names
        .into_iter()
        .map(|name| Candidate::new(source_dir, name))
        .collect())
}

/// Names present in the destination directory at the start of a sync run.
///
/// Taken once and never refreshed during the run.
#[derive(Debug, Clone, Default)]
pub struct DestinationSnapshot {
    names: HashSet<OsString>,
}

impl DestinationSnapshot {
    pub fn capture(destination_dir: &Path) -> Result<Self> {
        let entries =
            fs::read_dir(destination_dir).map_err(|source| SaverError::DestinationUnreadable {
                path: destination_dir.to_path_buf(),
                source,
            })?;

        let names = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name())
            .collect();

        Ok(Self { names })
    }

    pub fn contains(&self, name: impl AsRef<OsStr>) -> bool {
        self.names.contains(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Creates `dir_path` (and parents) unless it already exists.
pub fn ensure_directory(dir_path: &Path) -> Result<()> {
    if dir_path.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o765);
    }
    builder.create(dir_path)?;
    Ok(())
}

/// A saved wallpaper as shown in the gallery
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified_date: DateTime<Utc>,
}

impl GalleryEntry {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified_date: DateTime<Utc> = metadata.modified()?.into();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(GalleryEntry {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            modified_date,
        })
    }
}

/// Lists the saved wallpapers in the destination directory, sorted by name.
pub fn list_gallery(destination_dir: &Path) -> Result<Vec<GalleryEntry>> {
    let names =
        list_file_names(destination_dir).map_err(|source| SaverError::DestinationUnreadable {
            path: destination_dir.to_path_buf(),
            source,
        })?;

    let suffix = format!(".{}", OUTPUT_EXTENSION);
    let entries = names
        .iter()
        .filter(|name| name.to_string_lossy().ends_with(&suffix))
        .filter_map(|name| GalleryEntry::from_path(&destination_dir.join(name)).ok())
        .collect();

    Ok(entries)
}
