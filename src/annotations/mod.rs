//! Annotation data model, corpus store and derived views.

pub mod corpus;
pub mod display;
pub mod drafts;
pub mod export_preview;
pub mod label_index;
pub mod model;

pub use corpus::AnnotationCorpus;
pub use display::{DisplayRow, sorted_high_levels, sorted_qa_labels, sorted_subtasks};
pub use drafts::{HighLevelDraft, QaDraft, SubtaskDraft};
pub use export_preview::ExportPreview;
pub use label_index::{LabelIndexMap, MISSING_INDEX};
pub use model::{
    DEFAULT_FPS, Episode, EpisodeAnnotations, EpisodeIndex, HighLevelSegment, QaLabel,
    SubtaskSegment, frame_at,
};
