use std::cell::OnceCell;
use std::collections::BTreeMap;

use super::label_index::LabelIndexMap;
use super::model::{EpisodeAnnotations, EpisodeIndex, HighLevelSegment, QaLabel, SubtaskSegment};

/// In-memory annotation sets for every episode seen in this session.
///
/// The label index is cached and rebuilt lazily; only mutations that can change
/// the set of subtask labels drop the cache.
#[derive(Debug, Default)]
pub struct AnnotationCorpus {
    episodes: BTreeMap<EpisodeIndex, EpisodeAnnotations>,
    label_index: OnceCell<LabelIndexMap>,
    invalidations: u64,
}

impl AnnotationCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.episodes.clear();
        self.invalidate_labels();
    }

    pub fn episode(&self, episode: EpisodeIndex) -> Option<&EpisodeAnnotations> {
        self.episodes.get(&episode)
    }

    pub fn contains(&self, episode: EpisodeIndex) -> bool {
        self.episodes.contains_key(&episode)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EpisodeIndex, &EpisodeAnnotations)> {
        self.episodes.iter().map(|(index, set)| (*index, set))
    }

    /// Snapshot of an episode's set, empty when nothing is known yet.
    pub fn snapshot(&self, episode: EpisodeIndex) -> EpisodeAnnotations {
        self.episodes.get(&episode).cloned().unwrap_or_default()
    }

    /// Replace an episode's set wholesale.
    pub fn replace(&mut self, episode: EpisodeIndex, annotations: EpisodeAnnotations) {
        self.episodes.insert(episode, annotations);
        self.invalidate_labels();
    }

    /// Insert a set only when the episode is not known locally yet.
    pub fn insert_if_absent(&mut self, episode: EpisodeIndex, annotations: EpisodeAnnotations) -> bool {
        if self.episodes.contains_key(&episode) {
            return false;
        }
        self.replace(episode, annotations);
        true
    }

    pub fn add_subtask(&mut self, episode: EpisodeIndex, segment: SubtaskSegment) {
        self.entry(episode).subtasks.push(segment);
        self.invalidate_labels();
    }

    pub fn add_high_level(&mut self, episode: EpisodeIndex, segment: HighLevelSegment) {
        self.entry(episode).high_levels.push(segment);
    }

    pub fn add_qa_label(&mut self, episode: EpisodeIndex, label: QaLabel) {
        self.entry(episode).qa_labels.push(label);
    }

    pub fn remove_subtask(&mut self, episode: EpisodeIndex, index: usize) -> Option<SubtaskSegment> {
        let subtasks = &mut self.episodes.get_mut(&episode)?.subtasks;
        if index >= subtasks.len() {
            return None;
        }
        let removed = subtasks.remove(index);
        self.invalidate_labels();
        Some(removed)
    }

    pub fn remove_high_level(
        &mut self,
        episode: EpisodeIndex,
        index: usize,
    ) -> Option<HighLevelSegment> {
        let items = &mut self.episodes.get_mut(&episode)?.high_levels;
        (index < items.len()).then(|| items.remove(index))
    }

    pub fn remove_qa_label(&mut self, episode: EpisodeIndex, index: usize) -> Option<QaLabel> {
        let items = &mut self.episodes.get_mut(&episode)?.qa_labels;
        (index < items.len()).then(|| items.remove(index))
    }

    /// Rename a stored subtask. Returns false when the row does not exist.
    pub fn set_subtask_label(&mut self, episode: EpisodeIndex, index: usize, label: &str) -> bool {
        let Some(segment) = self.subtask_slot(episode, index) else {
            return false;
        };
        if segment.label != label {
            segment.label = label.to_string();
            self.invalidate_labels();
        }
        true
    }

    /// Move a stored subtask's interval; labels and the cached index are untouched.
    pub fn set_subtask_bounds(
        &mut self,
        episode: EpisodeIndex,
        index: usize,
        start: f64,
        end: f64,
    ) -> bool {
        let Some(segment) = self.subtask_slot(episode, index) else {
            return false;
        };
        segment.start = start;
        segment.end = end;
        true
    }

    /// High-level rows never feed the label index, so direct access is safe.
    pub fn high_level_mut(
        &mut self,
        episode: EpisodeIndex,
        index: usize,
    ) -> Option<&mut HighLevelSegment> {
        self.episodes.get_mut(&episode)?.high_levels.get_mut(index)
    }

    pub fn qa_label_mut(&mut self, episode: EpisodeIndex, index: usize) -> Option<&mut QaLabel> {
        self.episodes.get_mut(&episode)?.qa_labels.get_mut(index)
    }

    /// The label map for the whole corpus, rebuilt on first use after a change.
    pub fn label_index(&self) -> &LabelIndexMap {
        self.label_index
            .get_or_init(|| LabelIndexMap::from_episodes(self.episodes.values()))
    }

    /// Number of times the cached label map has been dropped.
    pub fn label_generation(&self) -> u64 {
        self.invalidations
    }

    fn entry(&mut self, episode: EpisodeIndex) -> &mut EpisodeAnnotations {
        self.episodes.entry(episode).or_default()
    }

    fn subtask_slot(&mut self, episode: EpisodeIndex, index: usize) -> Option<&mut SubtaskSegment> {
        self.episodes.get_mut(&episode)?.subtasks.get_mut(index)
    }

    fn invalidate_labels(&mut self) {
        self.label_index = OnceCell::new();
        self.invalidations += 1;
    }
}
