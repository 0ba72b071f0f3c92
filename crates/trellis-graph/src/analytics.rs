//! Graph analytics: degree centrality and community detection.
//!
//! Both measures work over the undirected projection of the knowledge
//! graph (parallel edges collapsed, self loops ignored) and are
//! recomputed wholesale on every call.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ordered_float::OrderedFloat;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::graph::KnowledgeGraph;

/// Derived metrics for a knowledge graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    /// Degree centrality per node, each score in [0, 1].
    pub centrality: BTreeMap<String, f64>,
    /// Communities, largest first.
    pub communities: Vec<BTreeSet<String>>,
}

/// Compute centrality and communities for a graph.
pub fn analyze(kg: &KnowledgeGraph) -> GraphMetrics {
    GraphMetrics {
        centrality: degree_centrality(kg),
        communities: greedy_modularity_communities(kg),
    }
}

/// Degree centrality: unique undirected neighbors divided by (n - 1).
///
/// Every node maps to a score in [0, 1]; a single-node graph scores 0.
pub fn degree_centrality(kg: &KnowledgeGraph) -> BTreeMap<String, f64> {
    let graph = kg.graph();
    let n = graph.node_count();
    let mut centrality = BTreeMap::new();

    for idx in graph.node_indices() {
        let neighbors: BTreeSet<_> = graph
            .neighbors_undirected(idx)
            .filter(|&other| other != idx)
            .collect();
        let score = if n <= 1 {
            0.0
        } else {
            neighbors.len() as f64 / (n - 1) as f64
        };
        centrality.insert(graph[idx].name.clone(), score);
    }
    centrality
}

/// Greedy modularity community detection (CNM-style agglomeration).
///
/// Starts from singleton communities and repeatedly applies the merge
/// with the largest modularity gain while that gain is positive. Ties
/// break on the smaller community pair, so the result is deterministic.
/// A graph with no edges yields singleton communities.
pub fn greedy_modularity_communities(kg: &KnowledgeGraph) -> Vec<BTreeSet<String>> {
    let graph = kg.graph();
    let names: Vec<String> = graph
        .node_indices()
        .map(|idx| graph[idx].name.clone())
        .collect();
    let index: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    // Undirected projection: unique edges, self loops dropped.
    let mut undirected: BTreeSet<(usize, usize)> = BTreeSet::new();
    for edge in graph.edge_references() {
        let a = index[graph[edge.source()].name.as_str()];
        let b = index[graph[edge.target()].name.as_str()];
        if a != b {
            undirected.insert((a.min(b), a.max(b)));
        }
    }
    let m = undirected.len();

    if m == 0 {
        return finalize(&names, &(0..names.len()).collect::<Vec<_>>());
    }

    // degree fractions a_i = k_i / (2m), per community
    let mut degree = vec![0usize; names.len()];
    for &(a, b) in &undirected {
        degree[a] += 1;
        degree[b] += 1;
    }
    let two_m = (2 * m) as f64;
    let mut fraction: HashMap<usize, f64> = degree
        .iter()
        .enumerate()
        .map(|(i, &k)| (i, k as f64 / two_m))
        .collect();

    // edges between communities, keyed (min, max)
    let mut between: HashMap<(usize, usize), usize> = HashMap::new();
    for &(a, b) in &undirected {
        *between.entry((a, b)).or_insert(0) += 1;
    }

    let mut community: Vec<usize> = (0..names.len()).collect();

    loop {
        // Deterministic scan: sorted pairs, strictly-greater keeps the
        // smallest pair on ties.
        let mut pairs: Vec<((usize, usize), usize)> =
            between.iter().map(|(&pair, &count)| (pair, count)).collect();
        pairs.sort();

        let mut best: Option<(OrderedFloat<f64>, (usize, usize))> = None;
        for ((ci, cj), count) in pairs {
            let gain = count as f64 / m as f64 - 2.0 * fraction[&ci] * fraction[&cj];
            let candidate = (OrderedFloat(gain), (ci, cj));
            if best.map_or(true, |(best_gain, _)| candidate.0 > best_gain) {
                best = Some(candidate);
            }
        }

        let Some((gain, (keep, absorb))) = best else {
            break;
        };
        if gain.into_inner() <= 0.0 {
            break;
        }

        // Merge `absorb` into `keep`.
        let absorbed_fraction = fraction.remove(&absorb).unwrap_or(0.0);
        if let Some(f) = fraction.get_mut(&keep) {
            *f += absorbed_fraction;
        }
        for c in community.iter_mut() {
            if *c == absorb {
                *c = keep;
            }
        }

        let mut rekeyed: HashMap<(usize, usize), usize> = HashMap::new();
        for ((a, b), count) in between.drain() {
            let a = if a == absorb { keep } else { a };
            let b = if b == absorb { keep } else { b };
            if a == b {
                continue;
            }
            *rekeyed.entry((a.min(b), a.max(b))).or_insert(0) += count;
        }
        between = rekeyed;
    }

    finalize(&names, &community)
}

fn finalize(names: &[String], community: &[usize]) -> Vec<BTreeSet<String>> {
    let mut grouped: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
    for (i, &c) in community.iter().enumerate() {
        grouped.entry(c).or_default().insert(names[i].clone());
    }
    let mut communities: Vec<BTreeSet<String>> = grouped.into_values().collect();
    communities.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| a.iter().next().cmp(&b.iter().next()))
    });
    communities
}
