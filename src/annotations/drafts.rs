//! Editor input buffers and the validation applied before an add.
//!
//! A draft that fails validation yields `None`; callers drop the add without
//! reporting anything.

use super::model::{HighLevelSegment, QaLabel, SubtaskSegment};

/// Pending subtask row as typed into the editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubtaskDraft {
    pub label: String,
    pub start: String,
    pub end: String,
}

impl SubtaskDraft {
    pub fn to_segment(&self) -> Option<SubtaskSegment> {
        let label = self.label.trim();
        if label.is_empty() {
            return None;
        }
        let (start, end) = parse_interval(&self.start, &self.end)?;
        Some(SubtaskSegment {
            start,
            end,
            label: label.to_string(),
        })
    }
}

/// Pending high-level row as typed into the editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighLevelDraft {
    pub start: String,
    pub end: String,
    pub user_prompt: String,
    pub robot_utterance: String,
    pub skill: String,
    pub scenario_type: String,
    pub response_type: String,
}

impl HighLevelDraft {
    pub fn to_segment(&self) -> Option<HighLevelSegment> {
        let user_prompt = self.user_prompt.trim();
        let robot_utterance = self.robot_utterance.trim();
        if user_prompt.is_empty() || robot_utterance.is_empty() {
            return None;
        }
        let (start, end) = parse_interval(&self.start, &self.end)?;
        Some(HighLevelSegment {
            start,
            end,
            user_prompt: user_prompt.to_string(),
            robot_utterance: robot_utterance.to_string(),
            skill: optional_text(&self.skill),
            scenario_type: optional_text(&self.scenario_type),
            response_type: optional_text(&self.response_type),
        })
    }
}

/// Pending QA row as typed into the editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QaDraft {
    pub frame_idx: String,
    pub kind: String,
    pub question: String,
    pub answer: String,
}

impl QaDraft {
    pub fn to_label(&self) -> Option<QaLabel> {
        let frame_idx = self.frame_idx.trim().parse::<u32>().ok()?;
        let question = self.question.trim();
        let answer = self.answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(QaLabel {
            frame_idx,
            kind: self.kind.trim().to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

/// Render seconds the way the editors prefill time fields.
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.3}")
}

fn parse_interval(start: &str, end: &str) -> Option<(f64, f64)> {
    let start = parse_seconds(start)?;
    let end = parse_seconds(end)?;
    (end > start).then_some((start, end))
}

fn parse_seconds(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn optional_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
