//! Local summary of what an export would produce.

use std::collections::HashMap;

use super::corpus::AnnotationCorpus;
use super::model::HighLevelSegment;

/// Counts mirroring the export endpoint's response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportPreview {
    /// Distinct subtask labels (rows of the subtask table).
    pub subtasks: usize,
    /// Distinct high-level tasks.
    pub tasks_high_level: usize,
    pub qa_labels: usize,
    pub episodes: usize,
}

impl ExportPreview {
    pub fn from_corpus(corpus: &AnnotationCorpus) -> Self {
        let tasks = high_level_task_indices(
            corpus
                .iter()
                .flat_map(|(_, annotations)| annotations.high_levels.iter()),
        );
        Self {
            subtasks: corpus.label_index().len(),
            tasks_high_level: tasks.len(),
            qa_labels: corpus
                .iter()
                .map(|(_, annotations)| annotations.qa_labels.len())
                .sum(),
            episodes: corpus
                .iter()
                .filter(|(_, annotations)| !annotations.is_empty())
                .count(),
        }
    }
}

/// Identity of a high-level task: every descriptive field joined together.
pub fn task_key(segment: &HighLevelSegment) -> String {
    [
        segment.user_prompt.as_str(),
        segment.robot_utterance.as_str(),
        segment.skill.as_deref().unwrap_or_default(),
        segment.scenario_type.as_deref().unwrap_or_default(),
        segment.response_type.as_deref().unwrap_or_default(),
    ]
    .join("||")
}

/// Task indices in first-seen order.
pub fn high_level_task_indices<'a>(
    segments: impl IntoIterator<Item = &'a HighLevelSegment>,
) -> HashMap<String, usize> {
    let mut indices = HashMap::new();
    for segment in segments {
        let next = indices.len();
        indices.entry(task_key(segment)).or_insert(next);
    }
    indices
}
