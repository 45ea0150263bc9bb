use serde::{Deserialize, Serialize};

/// Index of an episode inside the loaded dataset.
pub type EpisodeIndex = u32;

/// Frame rate assumed when the dataset does not report one.
pub const DEFAULT_FPS: f64 = 30.0;

/// Episode metadata reported by the dataset server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_index: EpisodeIndex,
    /// Frame count.
    #[serde(default)]
    pub length: u64,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: f64,
    /// Offset of this episode inside a concatenated source video.
    #[serde(default)]
    pub video_start_time: Option<f64>,
    #[serde(default)]
    pub video_end_time: Option<f64>,
}

impl Episode {
    /// Duration of the media actually served for this episode.
    ///
    /// Prefers the trimmed video bounds over the frame-derived duration so the
    /// timeline matches what the player shows.
    pub fn playable_duration(&self) -> Option<f64> {
        if let (Some(start), Some(end)) = (self.video_start_time, self.video_end_time) {
            let span = end - start;
            if span.is_finite() && span > 0.0 {
                return Some(span);
            }
        }
        (self.duration.is_finite() && self.duration > 0.0).then_some(self.duration)
    }
}

/// A labeled sub-goal interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubtaskSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub label: String,
}

/// An interval carrying a user prompt and the robot's reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighLevelSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub user_prompt: String,
    #[serde(default)]
    pub robot_utterance: String,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub scenario_type: Option<String>,
    #[serde(default)]
    pub response_type: Option<String>,
}

/// A point-in-time question/answer pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QaLabel {
    pub frame_idx: u32,
    /// Question category; empty when unspecified.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// All labels attached to one episode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeAnnotations {
    #[serde(default)]
    pub subtasks: Vec<SubtaskSegment>,
    #[serde(default)]
    pub high_levels: Vec<HighLevelSegment>,
    #[serde(default)]
    pub qa_labels: Vec<QaLabel>,
}

impl EpisodeAnnotations {
    pub fn is_empty(&self) -> bool {
        self.subtasks.is_empty() && self.high_levels.is_empty() && self.qa_labels.is_empty()
    }
}

/// Convert a playback position to a frame index at the given rate.
///
/// Non-positive or non-finite rates fall back to [`DEFAULT_FPS`].
pub fn frame_at(seconds: f64, fps: Option<f64>) -> u32 {
    let fps = fps
        .filter(|fps| fps.is_finite() && *fps > 0.0)
        .unwrap_or(DEFAULT_FPS);
    let frame = (seconds.max(0.0) * fps).round();
    if frame >= u32::MAX as f64 {
        u32::MAX
    } else {
        frame as u32
    }
}
