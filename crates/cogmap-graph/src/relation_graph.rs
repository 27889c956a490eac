//! Verb-labeled directed relation graph
//!
//! Nodes are surface strings, edges carry a verb. There is at most one
//! edge per (subject, object) pair: adding the same pair again replaces
//! the label.

use std::collections::{HashMap, HashSet};

use cogmap_core::Triple;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::EntityFrequencies;

/// Directed graph of entities connected by verb-labeled edges
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    graph: DiGraph<String, String>,
    index: HashMap<String, NodeIndex>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_graph(graph: DiGraph<String, String>) -> Self {
        let index = graph
            .node_indices()
            .map(|i| (graph[i].clone(), i))
            .collect();
        Self { graph, index }
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Add the edge subject -> object labeled with the verb
    ///
    /// Returns the label that was replaced when the pair already had an edge.
    pub fn add_relation(&mut self, triple: &Triple) -> Option<String> {
        let from = self.node(&triple.subject);
        let to = self.node(&triple.object);

        match self.graph.find_edge(from, to) {
            Some(edge) => Some(std::mem::replace(
                &mut self.graph[edge],
                triple.verb.clone(),
            )),
            None => {
                self.graph.add_edge(from, to, triple.verb.clone());
                None
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn degree_at(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// In-degree plus out-degree, 0 for unknown nodes
    pub fn degree(&self, name: &str) -> usize {
        self.index
            .get(name)
            .map(|&idx| self.degree_at(idx))
            .unwrap_or(0)
    }

    /// Label of the edge subject -> object
    pub fn label(&self, subject: &str, object: &str) -> Option<&str> {
        let from = *self.index.get(subject)?;
        let to = *self.index.get(object)?;
        self.graph
            .find_edge(from, to)
            .map(|edge| self.graph[edge].as_str())
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(move |i| self.graph[i].as_str())
    }

    /// Node names paired with their degree, in insertion order
    pub fn nodes_with_degree(&self) -> impl Iterator<Item = (&str, usize)> {
        self.graph
            .node_indices()
            .map(move |i| (self.graph[i].as_str(), self.degree_at(i)))
    }

    /// Edges as (subject, object, verb)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].as_str(),
                self.graph[e.target()].as_str(),
                e.weight().as_str(),
            )
        })
    }

    /// Edges as (subject position, object position, verb), positions
    /// matching the order of `nodes()`
    pub fn indexed_edges(&self) -> impl Iterator<Item = (usize, usize, &str)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight().as_str()))
    }

    /// Whether a node survives pruning
    fn retained(&self, idx: NodeIndex, frequencies: &EntityFrequencies, threshold: usize) -> bool {
        frequencies.count(&self.graph[idx]) >= threshold || self.degree_at(idx) > 1
    }

    /// Induced subgraph on the frequent or well-connected nodes
    ///
    /// A node is kept when its entity frequency reaches `threshold` or its
    /// degree in this (unpruned) graph exceeds 1. Edges survive only when
    /// both endpoints do.
    pub fn prune(&self, frequencies: &EntityFrequencies, threshold: usize) -> RelationGraph {
        let keep: HashSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&i| self.retained(i, frequencies, threshold))
            .collect();

        let graph = self.graph.filter_map(
            |i, name| keep.contains(&i).then(|| name.clone()),
            |_, label| Some(label.clone()),
        );

        Self::from_graph(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(triples: &[(&str, &str, &str)]) -> RelationGraph {
        let mut graph = RelationGraph::new();
        for (s, v, o) in triples {
            graph.add_relation(&Triple::new(*s, *v, *o));
        }
        graph
    }

    #[test]
    fn test_add_relation_creates_nodes_and_edge() {
        let graph = graph_of(&[("cat", "chased", "mouse")]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.label("cat", "mouse"), Some("chased"));
        assert_eq!(graph.label("mouse", "cat"), None);
    }

    #[test]
    fn test_duplicate_pair_overwrites_label() {
        let mut graph = graph_of(&[("cat", "chased", "mouse")]);
        let replaced = graph.add_relation(&Triple::new("cat", "caught", "mouse"));

        assert_eq!(replaced.as_deref(), Some("chased"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.label("cat", "mouse"), Some("caught"));
    }

    #[test]
    fn test_reverse_pair_is_separate_edge() {
        let graph = graph_of(&[("cat", "chased", "dog"), ("dog", "chased", "cat")]);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree("cat"), 2);
        assert_eq!(graph.degree("dog"), 2);
    }

    #[test]
    fn test_degree_counts_both_directions() {
        let graph = graph_of(&[("cat", "chased", "mouse"), ("dog", "chased", "cat")]);

        assert_eq!(graph.degree("cat"), 2);
        assert_eq!(graph.degree("mouse"), 1);
        assert_eq!(graph.degree("dog"), 1);
        assert_eq!(graph.degree("bird"), 0);
    }

    #[test]
    fn test_prune_keeps_connected_node_and_drops_dangling_edges() {
        let graph = graph_of(&[("cat", "chased", "mouse"), ("dog", "chased", "cat")]);
        let pruned = graph.prune(&EntityFrequencies::new(), 2);

        assert_eq!(pruned.nodes().collect::<Vec<_>>(), vec!["cat"]);
        assert_eq!(pruned.edge_count(), 0);
        // Retention uses the degree before pruning
        assert_eq!(pruned.degree("cat"), 0);
    }

    #[test]
    fn test_prune_keeps_frequent_nodes() {
        let graph = graph_of(&[("Alice", "met", "Bob"), ("Carol", "called", "Dave")]);
        let mut freqs = EntityFrequencies::new();
        for name in ["Alice", "Alice", "Bob", "Bob", "Carol"] {
            freqs.record(name);
        }

        let pruned = graph.prune(&freqs, 2);

        assert_eq!(pruned.nodes().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
        assert_eq!(pruned.label("Alice", "Bob"), Some("met"));
        assert!(!pruned.contains_node("Carol"));
    }

    #[test]
    fn test_prune_threshold_one_keeps_recognized_entities() {
        let graph = graph_of(&[("Alice", "met", "Bob"), ("Carol", "called", "Dave")]);
        let mut freqs = EntityFrequencies::new();
        for name in ["Alice", "Bob", "Carol", "Dave"] {
            freqs.record(name);
        }

        let pruned = graph.prune(&freqs, 1);
        assert_eq!(pruned.node_count(), 4);
        assert_eq!(pruned.edge_count(), 2);
    }

    #[test]
    fn test_prune_is_subgraph_satisfying_retention() {
        let graph = graph_of(&[
            ("a1", "x", "b1"),
            ("b1", "x", "c1"),
            ("c1", "x", "a1"),
            ("d1", "x", "e1"),
            ("f1", "x", "b1"),
            ("g1", "x", "h1"),
        ]);
        let mut freqs = EntityFrequencies::new();
        freqs.record("g1");
        freqs.record("g1");

        let pruned = graph.prune(&freqs, 2);

        for node in pruned.nodes() {
            assert!(graph.contains_node(node));
            assert!(freqs.count(node) >= 2 || graph.degree(node) > 1);
        }
        for (s, o, v) in pruned.edges() {
            assert!(pruned.contains_node(s) && pruned.contains_node(o));
            assert_eq!(graph.label(s, o), Some(v));
        }
        assert!(pruned.contains_node("g1"));
        assert!(!pruned.contains_node("h1"));
        assert!(!pruned.contains_node("d1"));
        assert_eq!(pruned.edge_count(), 3);
    }

    #[test]
    fn test_prune_empty() {
        let pruned = RelationGraph::new().prune(&EntityFrequencies::new(), 2);
        assert!(pruned.is_empty());
    }

    #[test]
    fn test_indexed_edges_match_node_order() {
        let graph = graph_of(&[("cat", "chased", "mouse"), ("dog", "chased", "cat")]);
        let nodes: Vec<&str> = graph.nodes().collect();

        for (s, o, verb) in graph.indexed_edges() {
            assert_eq!(graph.label(nodes[s], nodes[o]), Some(verb));
        }
    }
}
