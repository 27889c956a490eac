//! cogmap Graph - Relation graph accumulation and pruning
//!
//! Holds the two run-wide accumulators of the pipeline: entity frequency
//! counts fed by the entity recognizer, and the verb-labeled relation
//! graph fed by SVO triples. After the corpus is consumed the graph is
//! pruned to nodes that are frequent entities or well connected.

pub mod builder;
pub mod export;
pub mod frequency;
pub mod relation_graph;

pub use builder::{build_graph, BuildStats, CognitiveMap, GraphBuilder};
pub use export::{EdgeExport, GraphExport, NodeExport};
pub use frequency::EntityFrequencies;
pub use relation_graph::RelationGraph;
