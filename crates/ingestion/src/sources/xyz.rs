//! Multi-frame XYZ reader
//!
//! Each frame is an atom count line, a comment line and one line per atom:
//!
//! ```text
//! 3
//! time=0.5 Lattice="3.0 0 0 0 3.0 0 0 0 3.0"
//! O  0.000 0.000 0.000
//! H  0.757 0.586 0.000
//! H -0.757 0.586 0.000
//! ```
//!
//! `time` defaults to 0 and a missing `Lattice` means no periodic box.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use contracts::{ContractError, FrameSource, PeriodicBox, RawFrame, ReadContent};
use nalgebra::Vector3;
use tracing::debug;

/// Upper bound on coordinates reserved up front; the atom count comes from the file
const MAX_PREALLOCATED_ATOMS: usize = 1 << 20;

/// XYZ frame source
pub struct XyzSource {
    path: PathBuf,
    reader: Box<dyn BufRead + Send>,
    frames_read: u64,
    line: String,
}

impl XyzSource {
    /// Open an XYZ file
    pub fn open(path: &Path) -> Result<Self, ContractError> {
        let file = File::open(path).map_err(|e| ContractError::source_open(path, e.to_string()))?;
        debug!(path = %path.display(), "xyz source opened");
        Ok(Self::from_reader(path, BufReader::new(file)))
    }

    /// Read XYZ data from any buffered reader
    ///
    /// `path` is only used for error messages.
    pub fn from_reader(path: &Path, reader: impl BufRead + Send + 'static) -> Self {
        Self {
            path: path.to_path_buf(),
            reader: Box::new(reader),
            frames_read: 0,
            line: String::new(),
        }
    }

    /// Frames read so far
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn next_line(&mut self) -> Result<bool, ContractError> {
        self.line.clear();
        let n = self
            .reader
            .read_line(&mut self.line)
            .map_err(|e| self.error(e.to_string()))?;
        Ok(n > 0)
    }

    fn expect_line(&mut self, what: &str) -> Result<(), ContractError> {
        if self.next_line()? {
            Ok(())
        } else {
            Err(self.error(format!("unexpected end of file, expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> ContractError {
        ContractError::source_read(&self.path, self.frames_read, message)
    }
}

impl FrameSource for XyzSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&mut self, content: ReadContent) -> Result<Option<RawFrame>, ContractError> {
        // Atom count, skipping trailing blank lines
        loop {
            if !self.next_line()? {
                return Ok(None);
            }
            if !self.line.trim().is_empty() {
                break;
            }
        }

        let natoms: usize = self
            .line
            .trim()
            .parse()
            .map_err(|_| self.error(format!("invalid atom count '{}'", self.line.trim())))?;

        self.expect_line("comment line")?;
        let header = parse_comment(&self.line).map_err(|msg| self.error(msg))?;

        let reserve = if content.trajectory {
            natoms.min(MAX_PREALLOCATED_ATOMS)
        } else {
            0
        };
        let mut coords = Vec::with_capacity(reserve);
        for atom in 0..natoms {
            self.expect_line("atom line")?;
            if !content.trajectory {
                continue;
            }
            let xyz = parse_atom(&self.line)
                .ok_or_else(|| self.error(format!("malformed line for atom {atom}")))?;
            coords.push(xyz);
        }

        self.frames_read += 1;
        Ok(Some(RawFrame::new(coords, header.pbox, header.time)))
    }
}

#[derive(Debug, PartialEq)]
struct CommentHeader {
    time: f64,
    pbox: PeriodicBox,
}

/// Parse `key=value` pairs from the comment line; values may be quoted
fn parse_comment(line: &str) -> Result<CommentHeader, String> {
    let mut header = CommentHeader {
        time: 0.0,
        pbox: PeriodicBox::none(),
    };

    let mut rest = line.trim();
    while let Some(eq) = rest.find('=') {
        let key = rest[..eq].split_whitespace().last().unwrap_or_default();
        let after = &rest[eq + 1..];

        let (value, tail) = if let Some(quoted) = after.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => return Err(format!("unterminated quote for '{key}'")),
            }
        } else {
            let end = after.find(char::is_whitespace).unwrap_or(after.len());
            (&after[..end], &after[end..])
        };

        match key.to_ascii_lowercase().as_str() {
            "time" => {
                header.time = value
                    .parse()
                    .map_err(|_| format!("invalid time '{value}'"))?;
            }
            "lattice" => {
                let values: Vec<f32> = value
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .map_err(|_| format!("invalid lattice '{value}'"))?;
                let columns: [f32; 9] = values
                    .try_into()
                    .map_err(|_| format!("lattice needs 9 values, got '{value}'"))?;
                header.pbox = PeriodicBox::from_columns(columns);
            }
            _ => {}
        }

        rest = tail;
    }

    Ok(header)
}

fn parse_atom(line: &str) -> Option<Vector3<f32>> {
    let mut fields = line.split_whitespace().skip(1);
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    let z = fields.next()?.parse().ok()?;
    Some(Vector3::new(x, y, z))
}
