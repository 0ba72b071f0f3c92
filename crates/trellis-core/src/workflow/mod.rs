//! Linear workflow runner.
//!
//! A [`StateGraph`] is a set of named processing nodes chained by static
//! edges over a single state value. The chains this crate's pipelines
//! build are strictly linear: one entry point, one outgoing edge per
//! node, no branching, no cycles. [`StateGraph::compile`] validates the
//! wiring up front and produces a [`CompiledGraph`] that threads the
//! state through the nodes sequentially, to completion.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{TrellisError, TrellisResult};

/// A processing node: consumes the state, returns the evolved state.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Send + 'static,
{
    /// Run this node over the state.
    async fn run(&self, state: S) -> TrellisResult<S>;
}

/// Adapter turning a plain function into a [`Node`].
pub struct FnNode<S, F>
where
    F: Fn(S) -> TrellisResult<S> + Send + Sync,
{
    func: F,
    _state: PhantomData<fn(S) -> S>,
}

impl<S, F> FnNode<S, F>
where
    F: Fn(S) -> TrellisResult<S> + Send + Sync,
{
    /// Wrap a function as a node.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _state: PhantomData,
        }
    }
}

#[async_trait]
impl<S, F> Node<S> for FnNode<S, F>
where
    S: Send + 'static,
    F: Fn(S) -> TrellisResult<S> + Send + Sync,
{
    async fn run(&self, state: S) -> TrellisResult<S> {
        (self.func)(state)
    }
}

/// A workflow definition: named nodes plus static edges.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
    entry: Option<String>,
    finish: Option<String>,
}

impl<S: Send + 'static> StateGraph<S> {
    /// Create an empty workflow.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            entry: None,
            finish: None,
        }
    }

    /// Register a node under a name. Re-registering a name replaces the
    /// previous node.
    pub fn add_node(mut self, name: impl Into<String>, node: impl Node<S> + 'static) -> Self {
        self.nodes.insert(name.into(), Arc::new(node));
        self
    }

    /// Add a static edge between two registered nodes.
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Set the node execution starts at.
    pub fn set_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Set the node execution must end at.
    pub fn set_finish_point(mut self, name: impl Into<String>) -> Self {
        self.finish = Some(name.into());
        self
    }

    /// Validate the wiring and produce an executable chain.
    ///
    /// Rejects: a missing entry point, edges naming unregistered nodes,
    /// more than one outgoing edge per node (branching), revisited nodes
    /// (cycles), and a finish point the chain never reaches.
    pub fn compile(self) -> TrellisResult<CompiledGraph<S>> {
        let entry = self
            .entry
            .as_ref()
            .ok_or_else(|| TrellisError::workflow("no entry point set"))?;

        if !self.nodes.contains_key(entry) {
            return Err(TrellisError::workflow(format!(
                "entry point '{}' is not a registered node",
                entry
            )));
        }

        let mut outgoing: HashMap<&str, &str> = HashMap::new();
        for (from, to) in &self.edges {
            for endpoint in [from, to] {
                if !self.nodes.contains_key(endpoint) {
                    return Err(TrellisError::workflow(format!(
                        "edge references unregistered node '{}'",
                        endpoint
                    )));
                }
            }
            if outgoing.insert(from, to).is_some() {
                return Err(TrellisError::workflow(format!(
                    "node '{}' has more than one outgoing edge; chains must be linear",
                    from
                )));
            }
        }

        let mut order = vec![entry.clone()];
        let mut visited: HashSet<&str> = HashSet::from([entry.as_str()]);
        let mut current = entry.as_str();
        while let Some(&next) = outgoing.get(current) {
            if !visited.insert(next) {
                return Err(TrellisError::workflow(format!(
                    "cycle detected at node '{}'",
                    next
                )));
            }
            order.push(next.to_string());
            current = next;
        }

        if let Some(finish) = &self.finish {
            if order.last() != Some(finish) {
                return Err(TrellisError::workflow(format!(
                    "finish point '{}' is not reached by the chain from '{}'",
                    finish, entry
                )));
            }
        }

        let steps = order
            .into_iter()
            .map(|name| {
                let node = Arc::clone(&self.nodes[&name]);
                (name, node)
            })
            .collect();

        Ok(CompiledGraph { steps })
    }
}

impl<S: Send + 'static> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated, executable node chain.
pub struct CompiledGraph<S> {
    steps: Vec<(String, Arc<dyn Node<S>>)>,
}

impl<S> std::fmt::Debug for CompiledGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field(
                "steps",
                &self.steps.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<S: Send + 'static> CompiledGraph<S> {
    /// Run the chain over an initial state, returning the final state.
    ///
    /// Node errors abort the run and propagate.
    pub async fn invoke(&self, mut state: S) -> TrellisResult<S> {
        let run_id = Uuid::new_v4();
        for (name, node) in &self.steps {
            tracing::debug!(%run_id, node = %name.as_str(), "running workflow node");
            state = node.run(state).await?;
        }
        Ok(state)
    }

    /// Node names in execution order.
    pub fn node_order(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_graph() -> StateGraph<i32> {
        StateGraph::new()
            .add_node("double", FnNode::new(|state: i32| Ok(state * 2)))
            .add_node("increment", FnNode::new(|state: i32| Ok(state + 1)))
            .add_edge("double", "increment")
            .set_entry_point("double")
            .set_finish_point("increment")
    }

    #[tokio::test]
    async fn test_linear_chain_runs_in_order() {
        let compiled = linear_graph().compile().unwrap();
        assert_eq!(compiled.node_order(), vec!["double", "increment"]);
        assert_eq!(compiled.invoke(10).await.unwrap(), 21);
    }

    #[tokio::test]
    async fn test_single_node_chain() {
        let compiled = StateGraph::new()
            .add_node("only", FnNode::new(|state: i32| Ok(state - 5)))
            .set_entry_point("only")
            .set_finish_point("only")
            .compile()
            .unwrap();
        assert_eq!(compiled.invoke(7).await.unwrap(), 2);
    }

    #[test]
    fn test_missing_entry_point() {
        let graph: StateGraph<i32> =
            StateGraph::new().add_node("a", FnNode::new(|state: i32| Ok(state)));
        let err = graph.compile().unwrap_err();
        assert!(err.to_string().contains("no entry point"));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let graph = StateGraph::new()
            .add_node("a", FnNode::new(|state: i32| Ok(state)))
            .add_edge("a", "ghost")
            .set_entry_point("a");
        let err = graph.compile().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_branching_rejected() {
        let graph = StateGraph::new()
            .add_node("a", FnNode::new(|state: i32| Ok(state)))
            .add_node("b", FnNode::new(|state: i32| Ok(state)))
            .add_node("c", FnNode::new(|state: i32| Ok(state)))
            .add_edge("a", "b")
            .add_edge("a", "c")
            .set_entry_point("a");
        let err = graph.compile().unwrap_err();
        assert!(err.to_string().contains("more than one outgoing edge"));
    }

    #[test]
    fn test_cycle_rejected() {
        let graph = StateGraph::new()
            .add_node("a", FnNode::new(|state: i32| Ok(state)))
            .add_node("b", FnNode::new(|state: i32| Ok(state)))
            .add_edge("a", "b")
            .add_edge("b", "a")
            .set_entry_point("a");
        let err = graph.compile().unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_unreached_finish_point() {
        let graph = StateGraph::new()
            .add_node("a", FnNode::new(|state: i32| Ok(state)))
            .add_node("b", FnNode::new(|state: i32| Ok(state)))
            .set_entry_point("a")
            .set_finish_point("b");
        let err = graph.compile().unwrap_err();
        assert!(err.to_string().contains("not reached"));
    }

    #[tokio::test]
    async fn test_node_error_aborts_run() {
        let compiled = StateGraph::new()
            .add_node(
                "fail",
                FnNode::new(|_: i32| Err(TrellisError::validation("bad state"))),
            )
            .add_node("after", FnNode::new(|state: i32| Ok(state + 100)))
            .add_edge("fail", "after")
            .set_entry_point("fail")
            .compile()
            .unwrap();
        let err = compiled.invoke(1).await.unwrap_err();
        assert!(matches!(err, TrellisError::Validation { .. }));
    }
}
