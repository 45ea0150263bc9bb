//! AI generation parameters and request construction.
//!
//! Parameters are the user-configured defaults; per-call options decide how
//! the results merge with existing segments.

use serde::{Deserialize, Serialize};

use crate::annotations::EpisodeIndex;
use crate::api::{
    ApiError, FakeVqaRequest, GenerationMode, GenerationRequest, SubtasksRequest,
};

/// The two kinds of segments the AI plugin can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    #[default]
    Subtasks,
    FakeVqa,
}

impl GenerationKind {
    /// Short name used in status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Subtasks => "subtasks",
            Self::FakeVqa => "fake_vqa",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtaskParams {
    pub stride_s: f64,
    pub summary_frames: u32,
    pub segment_frames: u32,
    pub max_steps: u32,
    pub language: String,
    pub merge_adjacent: bool,
}

impl Default for SubtaskParams {
    fn default() -> Self {
        Self {
            stride_s: 2.0,
            summary_frames: 6,
            segment_frames: 8,
            max_steps: 200,
            language: "auto".into(),
            merge_adjacent: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VqaParams {
    pub stride_s: f64,
    pub window_s: f64,
    pub window_frames: u32,
    pub language: String,
    pub scenario_type: String,
    pub response_type: String,
    pub skill: String,
}

impl Default for VqaParams {
    fn default() -> Self {
        Self {
            stride_s: 6.0,
            window_s: 2.0,
            window_frames: 3,
            language: "en".into(),
            scenario_type: "vqa".into(),
            response_type: "answer".into(),
            skill: "fake_vqa".into(),
        }
    }
}

/// How one generation call merges into the episode's existing segments.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationOptions {
    pub mode: GenerationMode,
    /// Continue after the last existing segment instead of from the start.
    pub resume_from_last: bool,
    pub start_time_s: Option<f64>,
}

impl GenerationOptions {
    /// Batch runs always overwrite from the beginning.
    pub const BATCH: Self = Self {
        mode: GenerationMode::Replace,
        resume_from_last: false,
        start_time_s: None,
    };
}

/// Both parameter sets, as configured in the UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationParams {
    pub subtasks: SubtaskParams,
    pub fake_vqa: VqaParams,
}

impl GenerationParams {
    /// Build the request for one episode, rejecting inconsistent settings.
    pub fn request(
        &self,
        kind: GenerationKind,
        episode: EpisodeIndex,
        options: GenerationOptions,
    ) -> Result<GenerationRequest, ApiError> {
        if let Some(start) = options.start_time_s {
            if !start.is_finite() || start < 0.0 {
                return Err(invalid("Start time must be a non-negative number"));
            }
        }
        match kind {
            GenerationKind::Subtasks => {
                let params = &self.subtasks;
                require_positive(params.stride_s, "stride_s")?;
                Ok(GenerationRequest::Subtasks(SubtasksRequest {
                    episode_index: episode,
                    stride_s: params.stride_s,
                    summary_frames: params.summary_frames,
                    segment_frames: params.segment_frames,
                    max_steps: params.max_steps,
                    mode: options.mode,
                    resume_from_last: options.resume_from_last,
                    merge_adjacent: params.merge_adjacent,
                    language: params.language.trim().to_string(),
                    start_time_s: options.start_time_s,
                }))
            }
            GenerationKind::FakeVqa => {
                let params = &self.fake_vqa;
                require_positive(params.stride_s, "stride_s")?;
                require_positive(params.window_s, "window_s")?;
                if params.window_s > params.stride_s {
                    return Err(invalid(format!(
                        "window_s ({}) must be <= stride_s ({})",
                        params.window_s, params.stride_s
                    )));
                }
                Ok(GenerationRequest::FakeVqa(FakeVqaRequest {
                    episode_index: episode,
                    stride_s: params.stride_s,
                    window_s: params.window_s,
                    window_frames: params.window_frames.max(1),
                    mode: options.mode,
                    resume_from_last: options.resume_from_last,
                    language: params.language.trim().to_string(),
                    scenario_type: params.scenario_type.trim().to_string(),
                    response_type: params.response_type.trim().to_string(),
                    skill: params.skill.trim().to_string(),
                    start_time_s: options.start_time_s,
                }))
            }
        }
    }

    /// Check settings once before a batch so every item would be sendable.
    pub fn validate(&self, kind: GenerationKind) -> Result<(), ApiError> {
        self.request(kind, 0, GenerationOptions::BATCH).map(|_| ())
    }
}

fn require_positive(value: f64, name: &str) -> Result<(), ApiError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be greater than zero")))
    }
}

fn invalid(message: impl Into<String>) -> ApiError {
    ApiError::InvalidRequest(message.into())
}
