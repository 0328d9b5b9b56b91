//! Merge engine
//!
//! Fuses parsed requirements from several inputs into one list:
//! - One canonical entry per normalized package name
//! - A bare name is absorbed by, or upgraded to, a pinned constraint
//! - Any other disagreement between constraints is a [`ConflictError`]
//! - Comments and unparseable lines are kept once each, in first-seen order

mod conflict;
mod engine;
mod outcome;


pub use conflict::{resolve, ConflictError, ConstraintOrigin, Resolution};
pub use engine::{MergeOptions, MergeState};
pub use outcome::{MergeOutcome, PassThroughPlacement};

use tracing::{debug, info};

/// Merges requirement inputs with fixed options.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merge inputs in the order given. Stops at the first conflict.
    pub fn merge_blobs<S: AsRef<str>>(&self, blobs: &[S]) -> Result<MergeOutcome, ConflictError> {
        let mut state = MergeState::new();
        for (source_index, blob) in blobs.iter().enumerate() {
            state.absorb_blob(blob.as_ref(), source_index)?;
            debug!(source_index, packages = state.package_count(), "Absorbed input");
        }
        let outcome = state.finish(self.options);
        info!(
            inputs = blobs.len(),
            packages = outcome.entries().len(),
            pass_through = outcome.pass_through().len(),
            "Merged requirements"
        );
        Ok(outcome)
    }
}

/// Merge inputs into ordered output lines.
///
/// Entries are sorted by normalized name unless `order_preserving` is set,
/// in which case they keep first-seen order. Pass-through lines follow the
/// entries.
pub fn merge<S: AsRef<str>>(file_blobs: &[S], order_preserving: bool) -> Result<Vec<String>, ConflictError> {
    let merger = Merger::new(MergeOptions {
        order_preserving,
        ..Default::default()
    });
    Ok(merger.merge_blobs(file_blobs)?.lines())
}
