//! # Byte Sources
//!
//! Finite, randomly addressable byte sequences backing a file memory.
//!
//! A source is either a fixed in-memory buffer (built-in images or bytes
//! handed over by the host) or an external store: a read-only file handle
//! that is held open for the lifetime of the source and sized at open time.
//! Every read is addressed absolutely, so callers keep their own position.

use log::{debug, info};
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::demo_image::builtin_image;
use crate::types::LocationType;

/// Filename prefix selecting a built-in image instead of a file
pub const BUILTIN_PREFIX: &str = "builtin:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("source '{origin}' is unavailable: {reason}")]
    SourceUnavailable { origin: String, reason: String },
    #[error("offset {offset} is out of range for a source of {length} bytes")]
    OutOfRange { offset: i64, length: u64 },
}

impl SourceError {
    fn unavailable(origin: &Origin, reason: impl fmt::Display) -> Self {
        SourceError::SourceUnavailable {
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Names the backing store a device is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    Builtin(String),
    Path(PathBuf),
}

impl Origin {
    /// Parse a configured filename; `builtin:<name>` selects a built-in image
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix(BUILTIN_PREFIX) {
            Some(name) => Origin::Builtin(name.to_string()),
            None => Origin::Path(PathBuf::from(text)),
        }
    }

    /// Resolve a configured filename the way the location type asks for.
    /// Built-in names ignore the location type.
    pub fn resolve(filename: &str, location: LocationType, base_dir: &Path) -> Self {
        match (Origin::parse(filename), location) {
            (Origin::Path(path), LocationType::Relative) => Origin::Path(base_dir.join(path)),
            (origin, _) => origin,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Builtin(name) => write!(f, "{}{}", BUILTIN_PREFIX, name),
            Origin::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub enum ByteSource {
    FixedBuffer {
        origin: Origin,
        bytes: Arc<[u8]>,
    },
    ExternalStore {
        origin: Origin,
        file: File,
        length: u64,
    },
    /// Not open: zero length, every read fails
    Closed { origin: Origin },
}

impl ByteSource {
    /// Resolve and size the store named by `origin`
    pub fn open(origin: &Origin) -> Result<Self, SourceError> {
        let source = match origin {
            Origin::Builtin(name) => {
                let bytes = builtin_image(name)
                    .ok_or_else(|| SourceError::unavailable(origin, "unknown built-in image"))?;
                ByteSource::FixedBuffer {
                    origin: origin.clone(),
                    bytes: Arc::from(bytes),
                }
            }
            Origin::Path(path) => {
                let file = File::open(path).map_err(|e| SourceError::unavailable(origin, e))?;
                let metadata = file
                    .metadata()
                    .map_err(|e| SourceError::unavailable(origin, e))?;
                if !metadata.is_file() {
                    return Err(SourceError::unavailable(origin, "not a regular file"));
                }
                ByteSource::ExternalStore {
                    origin: origin.clone(),
                    file,
                    length: metadata.len(),
                }
            }
        };

        info!("Opened {} ({} bytes)", origin, source.len());
        Ok(source)
    }

    /// Wrap bytes supplied by the host
    pub fn from_bytes(origin: Origin, bytes: impl Into<Vec<u8>>) -> Self {
        ByteSource::FixedBuffer {
            origin,
            bytes: Arc::from(bytes.into()),
        }
    }

    pub fn closed(origin: Origin) -> Self {
        ByteSource::Closed { origin }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            ByteSource::FixedBuffer { origin, .. }
            | ByteSource::ExternalStore { origin, .. }
            | ByteSource::Closed { origin } => origin,
        }
    }

    pub fn len(&self) -> u64 {
        match self {
            ByteSource::FixedBuffer { bytes, .. } => bytes.len() as u64,
            ByteSource::ExternalStore { length, .. } => *length,
            ByteSource::Closed { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ByteSource::Closed { .. })
    }

    /// Release any held handle. The source keeps its origin but reports no data.
    pub fn close(&mut self) {
        if self.is_open() {
            debug!("Closing {}", self.origin());
            *self = ByteSource::Closed {
                origin: self.origin().clone(),
            };
        }
    }

    pub fn read_at(&self, offset: i64) -> Result<u8, SourceError> {
        match self {
            ByteSource::FixedBuffer { bytes, .. } => {
                let position = checked_position(offset, self.len())?;
                Ok(bytes[position as usize])
            }
            ByteSource::ExternalStore { origin, file, length } => {
                let position = checked_position(offset, *length)?;
                // Reading through `&File` leaves the source itself untouched
                let mut handle = file;
                let mut byte = [0u8; 1];
                handle
                    .seek(SeekFrom::Start(position))
                    .and_then(|_| handle.read_exact(&mut byte))
                    .map_err(|e| SourceError::unavailable(origin, e))?;
                Ok(byte[0])
            }
            ByteSource::Closed { origin } => {
                Err(SourceError::unavailable(origin, "source is not open"))
            }
        }
    }
}

fn checked_position(offset: i64, length: u64) -> Result<u64, SourceError> {
    u64::try_from(offset)
        .ok()
        .filter(|position| *position < length)
        .ok_or(SourceError::OutOfRange { offset, length })
}
