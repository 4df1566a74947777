//! Spotlight Saver - keeps the Windows lock-screen wallpapers
//!
//! This crate finds the full-size landscape photos among the opaque files of
//! the lock-screen image cache and copies each one, once, into a user-visible
//! folder.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod probe;
pub mod sync;

// Re-export primary types for convenience
pub use config::{SyncPaths, UserConfig};
pub use domain::{
    discover_candidates, ensure_directory, is_wallpaper, list_gallery, Candidate,
    DestinationSnapshot, GalleryEntry,
};
pub use error::{Result, SaverError};
pub use probe::{ImageProbe, Probe, ProbeResult};
pub use sync::{FolderSynchronizer, SyncReport};
