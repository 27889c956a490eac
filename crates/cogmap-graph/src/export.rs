//! JSON export of a cognitive map

use std::path::Path;

use chrono::{DateTime, Utc};
use cogmap_core::{CogmapError, Result};
use serde::{Deserialize, Serialize};

use crate::{BuildStats, CognitiveMap};

/// Serializable snapshot of a pruned cognitive map
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub generated_at: DateTime<Utc>,
    pub min_entity_freq: usize,
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
    pub stats: BuildStats,
}

/// A node with its degree in the pruned graph and its entity frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExport {
    pub id: String,
    pub degree: usize,
    pub frequency: usize,
}

/// A verb-labeled edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: String,
    pub target: String,
    pub label: String,
}

impl GraphExport {
    /// Snapshot a cognitive map
    pub fn from_map(map: &CognitiveMap) -> Self {
        let nodes = map
            .graph
            .nodes_with_degree()
            .map(|(id, degree)| NodeExport {
                id: id.to_string(),
                degree,
                frequency: map.frequencies.count(id),
            })
            .collect();

        let edges = map
            .graph
            .edges()
            .map(|(source, target, label)| EdgeExport {
                source: source.to_string(),
                target: target.to_string(),
                label: label.to_string(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            min_entity_freq: map.min_entity_freq,
            nodes,
            edges,
            stats: map.stats.clone(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to a file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?).map_err(|e| CogmapError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        tracing::info!(
            "Exported {} nodes and {} edges to {}",
            self.nodes.len(),
            self.edges.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityFrequencies, RelationGraph};
    use cogmap_core::Triple;

    fn sample_map() -> CognitiveMap {
        let mut graph = RelationGraph::new();
        graph.add_relation(&Triple::new("Alice", "met", "Bob"));
        graph.add_relation(&Triple::new("Bob", "visited", "Paris"));

        let mut frequencies = EntityFrequencies::new();
        frequencies.record("Alice");
        frequencies.record("Paris");
        frequencies.record("Paris");

        CognitiveMap {
            graph,
            frequencies,
            min_entity_freq: 2,
            stats: BuildStats::default(),
        }
    }

    #[test]
    fn test_export_nodes_and_edges() {
        let export = GraphExport::from_map(&sample_map());

        assert_eq!(
            export.nodes,
            vec![
                NodeExport {
                    id: "Alice".to_string(),
                    degree: 1,
                    frequency: 1
                },
                NodeExport {
                    id: "Bob".to_string(),
                    degree: 2,
                    frequency: 0
                },
                NodeExport {
                    id: "Paris".to_string(),
                    degree: 1,
                    frequency: 2
                },
            ]
        );
        assert_eq!(export.edges.len(), 2);
        assert_eq!(export.edges[1].label, "visited");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");

        GraphExport::from_map(&sample_map())
            .write_json(&path)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["min_entity_freq"], 2);
        assert_eq!(value["edges"][0]["source"], "Alice");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_write_json_bad_path() {
        let err = GraphExport::from_map(&sample_map())
            .write_json(Path::new("/nonexistent/dir/map.json"))
            .unwrap_err();
        assert!(matches!(err, CogmapError::Io { .. }));
    }
}
