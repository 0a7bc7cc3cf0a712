//! Consumer trait - analysis interface driven by the pipeline
//!
//! Defines the fixed capability set every analysis plugs in through.

use crate::{ContractError, FrameMetadata, RawFrame};

/// Stable ordinal assigned to a consumer at registration
pub type ConsumerId = usize;

/// Frame consumer
///
/// The pipeline calls `setup` once, `process` for every delivered frame in
/// order, then `teardown` once. Consumers own their analysis state
/// exclusively; frames are shared and must be treated as read-only.
pub trait Consumer: Send {
    /// Consumer name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Pre-processing hook, called before the first frame
    ///
    /// # Errors
    /// A setup error disables this consumer only
    fn setup(&mut self, _id: ConsumerId) -> Result<(), ContractError> {
        Ok(())
    }

    /// Per-frame hook
    ///
    /// # Errors
    /// Errors are recorded and the consumer keeps receiving frames
    fn process(&mut self, frame: &RawFrame, meta: &FrameMetadata) -> Result<(), ContractError>;

    /// Post-processing hook
    ///
    /// `last` is the metadata of the last frame delivered, `None` when no
    /// frame ever arrived.
    fn teardown(&mut self, _last: Option<&FrameMetadata>) -> Result<(), ContractError> {
        Ok(())
    }
}
