//! Graph-RAG pipeline: retrieve -> generate over a conversation.
//!
//! Retrieval queries the shared knowledge graph with the latest human
//! message and appends the result as a `GraphContext` message.
//! Generation pairs the most recent context with the most recent human
//! query and asks the injected LLM. Missing context or query yields a
//! fixed sentinel answer rather than an error; LLM transport failures
//! propagate.

use std::sync::Arc;

use async_trait::async_trait;

use trellis_core::error::{TrellisError, TrellisResult};
use trellis_core::traits::{GenerationOptions, Llm};
use trellis_core::types::{ChatMessage, PromptMessage, Subgraph};
use trellis_core::workflow::{CompiledGraph, Node, StateGraph};
use trellis_graph::SharedGraph;

/// Sentinel answer when no graph context is present.
pub const NO_GRAPH_CONTEXT: &str = "No graph context found";
/// Sentinel answer when no human query is present.
pub const NO_QUERY: &str = "No query found";
/// Sentinel answer when the workflow produced no AI message.
pub const NO_RESPONSE: &str = "No valid response generated";

/// Conversation state threaded through the pipeline.
pub type Conversation = Vec<ChatMessage>;

struct RetrieveNode {
    graph: SharedGraph,
}

#[async_trait]
impl Node<Conversation> for RetrieveNode {
    async fn run(&self, mut messages: Conversation) -> TrellisResult<Conversation> {
        let query = messages.iter().rev().find_map(|m| match m {
            ChatMessage::Human(content) => Some(content.clone()),
            _ => None,
        });

        let subgraph = match query {
            Some(query) => {
                let graph = self
                    .graph
                    .read()
                    .map_err(|_| TrellisError::graph("knowledge graph lock poisoned"))?;
                graph.query(&query)
            }
            None => Subgraph::default(),
        };

        tracing::debug!(
            entities = subgraph.entities.len(),
            relations = subgraph.relations.len(),
            "retrieved subgraph"
        );
        messages.push(ChatMessage::graph_context(subgraph));
        Ok(messages)
    }
}

struct GenerateNode {
    llm: Arc<dyn Llm>,
}

#[async_trait]
impl Node<Conversation> for GenerateNode {
    async fn run(&self, mut messages: Conversation) -> TrellisResult<Conversation> {
        let Some(subgraph) = messages.iter().rev().find_map(ChatMessage::subgraph).cloned()
        else {
            messages.push(ChatMessage::ai(NO_GRAPH_CONTEXT));
            return Ok(messages);
        };

        let Some(query) = messages
            .iter()
            .rev()
            .find_map(|m| match m {
                ChatMessage::Human(content) => Some(content.clone()),
                _ => None,
            })
        else {
            messages.push(ChatMessage::ai(NO_QUERY));
            return Ok(messages);
        };

        let prompt = vec![
            PromptMessage::system(format!(
                "You answer questions using only the following knowledge graph facts.\n\
                 If the facts are insufficient, say so.\n\nFACTS:\n{}",
                subgraph.to_facts_block()
            )),
            PromptMessage::user(query),
        ];

        let response = self
            .llm
            .generate(&prompt, Some(GenerationOptions::default()))
            .await?;
        let answer = response
            .content
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string());

        messages.push(ChatMessage::ai(answer));
        Ok(messages)
    }
}

/// Retrieval-augmented generation pipeline over the knowledge graph.
pub struct RagPipeline {
    workflow: CompiledGraph<Conversation>,
}

impl RagPipeline {
    /// Build a pipeline over a shared graph and an LLM backend.
    pub fn new(graph: SharedGraph, llm: Arc<dyn Llm>) -> TrellisResult<Self> {
        let workflow = StateGraph::new()
            .add_node("retrieve", RetrieveNode { graph })
            .add_node("generate", GenerateNode { llm })
            .add_edge("retrieve", "generate")
            .set_entry_point("retrieve")
            .set_finish_point("generate")
            .compile()?;
        Ok(Self { workflow })
    }

    /// Run a pre-seeded conversation through the pipeline.
    pub async fn invoke(&self, conversation: Conversation) -> TrellisResult<Conversation> {
        self.workflow.invoke(conversation).await
    }

    /// Answer a single text query.
    ///
    /// Seeds the conversation with one human message, runs the chain,
    /// and returns the final AI message.
    pub async fn run(&self, query: &str) -> TrellisResult<ChatMessage> {
        let conversation = self.invoke(vec![ChatMessage::human(query)]).await?;
        Ok(conversation
            .into_iter()
            .rev()
            .find(|m| matches!(m, ChatMessage::Ai(_)))
            .unwrap_or_else(|| ChatMessage::ai(NO_RESPONSE)))
    }
}
