//! Graph-update hook for the feedback loop.

use async_trait::async_trait;

use crate::error::TrellisResult;
use crate::types::FeedbackRecord;

/// Applies an incorrect-answer feedback record to a knowledge graph.
///
/// The learning pipeline forwards every record flagged incorrect to this
/// hook, exactly once per record; correct records never reach it.
#[async_trait]
pub trait GraphUpdater: Send + Sync {
    /// Apply one feedback record.
    async fn update_with_feedback(&self, record: &FeedbackRecord) -> TrellisResult<()>;
}
