//! Bundled frame sources

mod xyz;

pub use xyz::XyzSource;

use std::path::Path;

use contracts::{ContractError, FrameSource, SourceOpener};

/// Opens a source by file extension
///
/// Only `.xyz` has a bundled reader; other trajectory formats need an
/// opener supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOpener;

impl FormatOpener {
    /// Create the default opener
    pub fn new() -> Self {
        Self
    }
}

impl SourceOpener for FormatOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, ContractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xyz" => Ok(Box::new(XyzSource::open(path)?)),
            _ => Err(ContractError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
