// Image probe: identifies which extensionless cache files are images
use crate::error::{Result, SaverError};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Outcome of probing a single candidate file
#[derive(Debug, Clone)]
pub enum ProbeResult {
    /// The file decoded as a raster image
    Decoded {
        width: u32,
        height: u32,
        image: DynamicImage,
    },
    /// The file is not an image this probe can decode
    NotAnImage,
}

impl ProbeResult {
    pub fn from_image(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        ProbeResult::Decoded {
            width,
            height,
            image,
        }
    }
}

/// Something that can classify a candidate file.
///
/// Implementations must be pure reads: no filesystem writes.
pub trait Probe: Send + Sync {
    /// Returns `Err` only for I/O faults reading the file; undecodable
    /// content is `Ok(ProbeResult::NotAnImage)`.
    fn probe(&self, path: &Path) -> Result<ProbeResult>;
}

/// Decodes candidates with the `image` crate, guessing the format from the
/// file contents since cache files carry no extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProbe;

impl ImageProbe {
    pub fn new() -> Self {
        Self
    }

    /// Classifies raw bytes. Unknown formats and corrupt data both yield
    /// `NotAnImage`.
    pub fn probe_bytes(bytes: Vec<u8>) -> ProbeResult {
        let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
            Ok(reader) => reader,
            Err(_) => return ProbeResult::NotAnImage,
        };

        match reader.decode() {
            Ok(image) => ProbeResult::from_image(image),
            Err(_) => ProbeResult::NotAnImage,
        }
    }
}

impl Probe for ImageProbe {
    fn probe(&self, path: &Path) -> Result<ProbeResult> {
        let bytes = fs::read(path).map_err(|source| SaverError::CandidateUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::probe_bytes(bytes))
    }
}
