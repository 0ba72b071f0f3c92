//! Feedback learning pipeline: a single process node.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use trellis_core::error::TrellisResult;
use trellis_core::traits::GraphUpdater;
use trellis_core::types::{EntityProperties, FeedbackRecord};
use trellis_core::workflow::{CompiledGraph, Node, StateGraph};

/// State threaded through the learning pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningState {
    /// Queries seen so far.
    pub queries: Vec<String>,
    /// Responses generated for them.
    pub responses: Vec<String>,
    /// Newly discovered entities awaiting graph insertion.
    pub new_entities: EntityProperties,
    /// Feedback records to process.
    pub feedback: Vec<FeedbackRecord>,
}

struct ProcessFeedbackNode {
    updater: Arc<dyn GraphUpdater>,
}

#[async_trait]
impl Node<LearningState> for ProcessFeedbackNode {
    async fn run(&self, state: LearningState) -> TrellisResult<LearningState> {
        let mut forwarded = 0usize;
        for record in &state.feedback {
            if !record.correct {
                self.updater.update_with_feedback(record).await?;
                forwarded += 1;
            }
        }
        tracing::debug!(total = state.feedback.len(), forwarded, "processed feedback");
        Ok(state)
    }
}

/// Feedback-driven graph update pipeline.
pub struct LearningPipeline {
    workflow: CompiledGraph<LearningState>,
}

impl LearningPipeline {
    /// Build a pipeline over a graph-update hook.
    pub fn new(updater: Arc<dyn GraphUpdater>) -> TrellisResult<Self> {
        let workflow = StateGraph::new()
            .add_node("process", ProcessFeedbackNode { updater })
            .set_entry_point("process")
            .set_finish_point("process")
            .compile()?;
        Ok(Self { workflow })
    }

    /// Run the pipeline over a learning state.
    pub async fn run(&self, state: LearningState) -> TrellisResult<LearningState> {
        self.workflow.invoke(state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mockall::mock! {
        Updater {}

        #[async_trait]
        impl GraphUpdater for Updater {
            async fn update_with_feedback(&self, record: &FeedbackRecord) -> TrellisResult<()>;
        }
    }

    fn state_with(feedback: Vec<FeedbackRecord>) -> LearningState {
        LearningState {
            queries: feedback.iter().map(|f| f.query.clone()).collect(),
            responses: feedback.iter().map(|f| f.response.clone()).collect(),
            feedback,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_correct_feedback_triggers_no_update() {
        let mut updater = MockUpdater::new();
        updater.expect_update_with_feedback().times(0);

        let pipeline = LearningPipeline::new(Arc::new(updater)).unwrap();
        let state = state_with(vec![
            FeedbackRecord::correct("q1", "a1"),
            FeedbackRecord::correct("q2", "a2"),
        ]);
        pipeline.run(state).await.unwrap();
    }

    #[tokio::test]
    async fn test_incorrect_feedback_triggers_one_update_each() {
        let mut updater = MockUpdater::new();
        updater
            .expect_update_with_feedback()
            .withf(|record: &FeedbackRecord| !record.correct)
            .times(2)
            .returning(|_| Ok(()));

        let pipeline = LearningPipeline::new(Arc::new(updater)).unwrap();
        let state = state_with(vec![
            FeedbackRecord::incorrect("q1", "a1", serde_json::json!({"entity": "A"})),
            FeedbackRecord::correct("q2", "a2"),
            FeedbackRecord::incorrect("q3", "a3", serde_json::json!({"entity": "B"})),
        ]);
        pipeline.run(state).await.unwrap();
    }

    #[tokio::test]
    async fn test_state_passes_through_unchanged() {
        let mut updater = MockUpdater::new();
        updater
            .expect_update_with_feedback()
            .returning(|_| Ok(()));

        let pipeline = LearningPipeline::new(Arc::new(updater)).unwrap();
        let state = state_with(vec![FeedbackRecord::incorrect(
            "q",
            "a",
            serde_json::json!({"entity": "A"}),
        )]);
        let result = pipeline.run(state).await.unwrap();

        assert_eq!(result.queries, vec!["q"]);
        assert_eq!(result.responses, vec!["a"]);
        assert_eq!(result.feedback.len(), 1);
    }
}
