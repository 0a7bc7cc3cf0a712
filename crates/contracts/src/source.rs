//! FrameSource trait - trajectory file reader abstraction
//!
//! Decouples the reader task from concrete file formats. A source is bound
//! to one file and is strictly forward: no seeking, one frame per call.

use std::path::Path;

use crate::{ContractError, RawFrame};

/// What a `read` call should fill in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadContent {
    /// Atom names, residues and other structural data
    pub structure: bool,

    /// Coordinates, box and time
    pub trajectory: bool,
}

impl ReadContent {
    /// Coordinates, box and time only
    pub fn trajectory() -> Self {
        Self {
            structure: false,
            trajectory: true,
        }
    }
}

/// Sequential frame reader bound to one file
///
/// # Example
///
/// ```ignore
/// let mut source = opener.open(Path::new("run1.xyz"))?;
/// while let Some(frame) = source.read(ReadContent::trajectory())? {
///     println!("t = {}", frame.time);
/// }
/// ```
pub trait FrameSource: Send {
    /// Path this source reads from
    fn path(&self) -> &Path;

    /// Read the next frame
    ///
    /// Returns `Ok(None)` at end of file.
    ///
    /// # Errors
    /// Returns a read error if the file is truncated or malformed
    fn read(&mut self, content: ReadContent) -> Result<Option<RawFrame>, ContractError>;
}

/// Opens files as frame sources
///
/// Shared with the reader thread, hence `Send + Sync`.
pub trait SourceOpener: Send + Sync {
    /// Open `path` for sequential reading
    ///
    /// # Errors
    /// Returns an open error if the file is unreadable or of unknown kind
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, ContractError>;
}
