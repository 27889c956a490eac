//! Graph builder
//!
//! Drives the tagger over every sentence of the corpus, feeding entity
//! mentions into the frequency table and accepted SVO triples into the
//! relation graph, then prunes once at the end.

use cogmap_core::{GraphConfig, Result, Triple};
use cogmap_extractor::{candidate_triple, is_acceptable, split_sentences, tag_sentence, Tagger};
use serde::Serialize;

use crate::{EntityFrequencies, RelationGraph};

/// Entities listed in the build summary
const TOP_ENTITIES_LOGGED: usize = 5;

/// Counters collected while building a cognitive map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Sentences sent to the tagger
    pub sentences: usize,
    /// Entity mentions counted after filtering
    pub entity_mentions: usize,
    /// Triples added to the graph
    pub triples_accepted: usize,
    /// Triples dropped for a self-relation or an unclean field
    pub triples_rejected: usize,
    /// Edges whose verb was replaced by a later triple
    pub labels_overwritten: usize,
    pub nodes_before_pruning: usize,
    pub edges_before_pruning: usize,
    pub nodes_after_pruning: usize,
    pub edges_after_pruning: usize,
}

/// The pruned graph together with the data it was pruned with
#[derive(Debug, Clone)]
pub struct CognitiveMap {
    /// Pruned relation graph
    pub graph: RelationGraph,
    /// Entity frequencies over the whole corpus
    pub frequencies: EntityFrequencies,
    /// Threshold used for pruning
    pub min_entity_freq: usize,
    pub stats: BuildStats,
}

/// Accumulates entity counts and relations sentence by sentence
pub struct GraphBuilder<'a> {
    tagger: &'a dyn Tagger,
    min_entity_freq: usize,
    frequencies: EntityFrequencies,
    graph: RelationGraph,
    stats: BuildStats,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder that tags with `tagger` and prunes at `min_entity_freq`
    pub fn new(tagger: &'a dyn Tagger, min_entity_freq: usize) -> Self {
        Self {
            tagger,
            min_entity_freq,
            frequencies: EntityFrequencies::new(),
            graph: RelationGraph::new(),
            stats: BuildStats::default(),
        }
    }

    /// Create from config
    pub fn from_config(tagger: &'a dyn Tagger, config: &GraphConfig) -> Self {
        Self::new(tagger, config.min_entity_freq)
    }

    /// Tag one sentence and fold its entities and relation into the state
    ///
    /// Returns the triple added to the graph, if any.
    pub async fn add_sentence(&mut self, sentence: &str) -> Result<Option<Triple>> {
        let tagged = tag_sentence(self.tagger, sentence).await?;
        self.stats.sentences += 1;

        for entity in &tagged.entities {
            self.frequencies.record(&entity.word);
        }
        self.stats.entity_mentions += tagged.entities.len();

        let Some(triple) = candidate_triple(&tagged.pos) else {
            return Ok(None);
        };

        if !is_acceptable(&triple) {
            tracing::debug!("Rejected triple {}", triple);
            self.stats.triples_rejected += 1;
            return Ok(None);
        }

        if let Some(previous) = self.graph.add_relation(&triple) {
            tracing::debug!(
                "Edge {} -> {} relabeled from '{}' to '{}'",
                triple.subject,
                triple.object,
                previous,
                triple.verb
            );
            self.stats.labels_overwritten += 1;
        }
        self.stats.triples_accepted += 1;

        Ok(Some(triple))
    }

    /// Split text into sentences and add each one in order
    pub async fn add_text(&mut self, text: &str) -> Result<()> {
        for sentence in split_sentences(text) {
            self.add_sentence(&sentence).await?;
        }
        Ok(())
    }

    /// Entity counts accumulated so far
    pub fn frequencies(&self) -> &EntityFrequencies {
        &self.frequencies
    }

    /// Unpruned relation graph accumulated so far
    pub fn graph(&self) -> &RelationGraph {
        &self.graph
    }

    /// Prune the accumulated graph and return the cognitive map
    pub fn finish(self) -> CognitiveMap {
        let mut stats = self.stats;
        stats.nodes_before_pruning = self.graph.node_count();
        stats.edges_before_pruning = self.graph.edge_count();

        let pruned = self.graph.prune(&self.frequencies, self.min_entity_freq);
        stats.nodes_after_pruning = pruned.node_count();
        stats.edges_after_pruning = pruned.edge_count();

        tracing::info!(
            "Built graph from {} sentences: {} triples ({} rejected, {} relabeled), \
             {} -> {} nodes, {} -> {} edges after pruning at frequency {}",
            stats.sentences,
            stats.triples_accepted,
            stats.triples_rejected,
            stats.labels_overwritten,
            stats.nodes_before_pruning,
            stats.nodes_after_pruning,
            stats.edges_before_pruning,
            stats.edges_after_pruning,
            self.min_entity_freq
        );

        if !self.frequencies.is_empty() {
            let top: Vec<String> = self
                .frequencies
                .most_common(TOP_ENTITIES_LOGGED)
                .into_iter()
                .map(|(entity, count)| format!("{entity} ({count})"))
                .collect();
            tracing::info!("Most frequent entities: {}", top.join(", "));
        }

        CognitiveMap {
            graph: pruned,
            frequencies: self.frequencies,
            min_entity_freq: self.min_entity_freq,
            stats,
        }
    }
}

/// Build and prune the cognitive map for a corpus
pub async fn build_graph(
    text: &str,
    tagger: &dyn Tagger,
    config: &GraphConfig,
) -> Result<CognitiveMap> {
    tracing::info!("Tagging corpus with the {} tagger", tagger.name());

    let mut builder = GraphBuilder::from_config(tagger, config);
    builder.add_text(text).await?;
    Ok(builder.finish())
}
