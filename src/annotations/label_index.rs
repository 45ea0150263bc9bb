//! Corpus-wide subtask label numbering.
//!
//! Every distinct non-empty subtask label across all known episodes receives
//! the position it holds in byte-wise sorted order. The map is a pure function
//! of the corpus, so the timeline, the editors and the export preview agree on
//! the number shown for a label.

use std::collections::{BTreeMap, BTreeSet};

use super::model::EpisodeAnnotations;

/// Placeholder shown for segments whose label has no index (empty labels).
pub const MISSING_INDEX: &str = "?";

/// Mapping from subtask label to its stable integer index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelIndexMap {
    indices: BTreeMap<String, usize>,
}

impl LabelIndexMap {
    /// Build the map from every episode's subtasks.
    pub fn from_episodes<'a>(episodes: impl IntoIterator<Item = &'a EpisodeAnnotations>) -> Self {
        let labels: BTreeSet<&str> = episodes
            .into_iter()
            .flat_map(|annotations| annotations.subtasks.iter())
            .map(|segment| segment.label.as_str())
            .filter(|label| !label.is_empty())
            .collect();
        // BTreeSet iterates in byte order, which is the ordering indices follow.
        let indices = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| (label.to_string(), index))
            .collect();
        Self { indices }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.indices.get(label).copied()
    }

    /// Index rendered for display, or [`MISSING_INDEX`].
    pub fn display_index(&self, label: &str) -> String {
        self.get(label)
            .map(|index| index.to_string())
            .unwrap_or_else(|| MISSING_INDEX.to_string())
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Labels in index order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.indices.keys().map(String::as_str)
    }
}
