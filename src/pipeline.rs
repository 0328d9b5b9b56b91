//! Fuse pipeline
//!
//! Runs one fuse invocation end to end:
//! - Validate input and output paths before touching anything
//! - Read every input fully into memory
//! - Merge through the engine
//! - Deliver the result to stdout or atomically to the output file
//!
//! Every failure is detected before output is written, and the output file
//! only appears once its full contents are on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::FuseConfig;
use crate::error::{FuseError, FuseResult};
use crate::merge::{MergeOutcome, Merger};

/// Separator between paths in the `--input` argument.
pub const INPUT_SEPARATOR: char = '|';

/// One fuse invocation.
#[derive(Debug, Clone, Default)]
pub struct FuseRequest {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub overwrite: bool,
}

impl FuseRequest {
    /// Build from the raw `--input` list.
    pub fn new(input_list: &str, output: Option<PathBuf>, overwrite: bool) -> Self {
        Self {
            inputs: split_input_list(input_list),
            output,
            overwrite,
        }
    }
}

/// Split a pipe-separated list of paths, trimming whitespace and skipping empties.
pub fn split_input_list(list: &str) -> Vec<PathBuf> {
    list.split(INPUT_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// An input file read into memory.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub path: PathBuf,
    pub contents: String,
    /// SHA-256 of the raw bytes, hex encoded.
    pub digest: String,
}

/// Successful merge with the inputs it came from.
#[derive(Debug, Clone)]
pub struct FuseRun {
    pub inputs: Vec<LoadedInput>,
    pub outcome: MergeOutcome,
}

impl AsRef<Path> for LoadedInput {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Check that every input exists and the output may be written.
pub fn validate_paths(request: &FuseRequest) -> FuseResult<()> {
    if request.inputs.is_empty() {
        return Err(FuseError::NoInputs);
    }
    for input in &request.inputs {
        if !input.is_file() {
            return Err(FuseError::InputNotFound(input.clone()));
        }
    }
    if let Some(output) = &request.output {
        if output.exists() && !request.overwrite {
            return Err(FuseError::OutputExists(output.clone()));
        }
    }
    Ok(())
}

/// Read every input fully.
pub fn read_inputs(paths: &[PathBuf]) -> FuseResult<Vec<LoadedInput>> {
    paths
        .iter()
        .map(|path| {
            let bytes = fs::read(path).map_err(|e| FuseError::io("read", path, e))?;
            let digest = hex::encode(Sha256::digest(&bytes));
            let contents = String::from_utf8(bytes).map_err(|e| {
                FuseError::io(
                    "read",
                    path,
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()),
                )
            })?;
            debug!(path = %path.display(), bytes = contents.len(), "Read input");
            Ok(LoadedInput {
                path: path.clone(),
                contents,
                digest,
            })
        })
        .collect()
}

/// Validate, read and merge. Writes nothing.
pub fn run(request: &FuseRequest, config: &FuseConfig) -> FuseResult<FuseRun> {
    validate_paths(request)?;
    let inputs = read_inputs(&request.inputs)?;

    let merger = Merger::new(config.merge_options());
    let blobs: Vec<&str> = inputs.iter().map(|i| i.contents.as_str()).collect();
    let outcome = merger.merge_blobs(&blobs).map_err(|conflict| FuseError::Conflict {
        message: conflict.describe(&inputs),
        conflict,
    })?;

    Ok(FuseRun { inputs, outcome })
}

/// Send `text` to the output file, or to `stdout` when there is none.
pub fn deliver<W: Write>(output: Option<&Path>, overwrite: bool, text: &str, stdout: &mut W) -> FuseResult<()> {
    match output {
        Some(path) => write_atomic(path, text, overwrite),
        None => stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| FuseError::io("write", "<stdout>", e)),
    }
}

/// Write through a temporary file in the destination directory, then rename.
///
/// Without `overwrite` the rename refuses to replace an existing file.
pub fn write_atomic(path: &Path, contents: &str, overwrite: bool) -> FuseResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FuseError::io("create temporary file in", dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| FuseError::io("write", tmp.path().to_path_buf(), e))?;

    let persisted = if overwrite {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    persisted.map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            FuseError::OutputExists(path.to_path_buf())
        } else {
            FuseError::io("write", path, e.error)
        }
    })?;

    info!(path = %path.display(), bytes = contents.len(), "Wrote merged requirements");
    Ok(())
}
