//! Local edits to the active episode's annotation set.
//!
//! Adds run the draft validation and quietly do nothing on bad input
//! (`Ok(false)`). Rows are addressed by storage index, as carried by
//! [`crate::annotations::DisplayRow`].

use super::{Session, SessionError};
use crate::annotations::{
    HighLevelDraft, HighLevelSegment, QaDraft, QaLabel, SubtaskDraft, SubtaskSegment,
};

impl Session {
    pub fn add_subtask(&mut self, draft: &SubtaskDraft) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        let Some(segment) = draft.to_segment() else {
            return Ok(false);
        };
        self.corpus.add_subtask(episode, segment);
        Ok(true)
    }

    pub fn add_high_level(&mut self, draft: &HighLevelDraft) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        let Some(segment) = draft.to_segment() else {
            return Ok(false);
        };
        self.corpus.add_high_level(episode, segment);
        Ok(true)
    }

    pub fn add_qa_label(&mut self, draft: &QaDraft) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        let Some(label) = draft.to_label() else {
            return Ok(false);
        };
        self.corpus.add_qa_label(episode, label);
        Ok(true)
    }

    /// Add from the editors' own draft rows, clearing text fields on success.
    pub fn commit_subtask_draft(&mut self) -> Result<bool, SessionError> {
        let draft = self.drafts.subtask.clone();
        let added = self.add_subtask(&draft)?;
        if added {
            self.drafts.subtask.label.clear();
        }
        Ok(added)
    }

    pub fn commit_high_level_draft(&mut self) -> Result<bool, SessionError> {
        let draft = self.drafts.high_level.clone();
        let added = self.add_high_level(&draft)?;
        if added {
            self.drafts.high_level.user_prompt.clear();
            self.drafts.high_level.robot_utterance.clear();
        }
        Ok(added)
    }

    pub fn commit_qa_draft(&mut self) -> Result<bool, SessionError> {
        let draft = self.drafts.qa.clone();
        let added = self.add_qa_label(&draft)?;
        if added {
            self.drafts.qa.question.clear();
            self.drafts.qa.answer.clear();
        }
        Ok(added)
    }

    /// Overwrite a stored subtask in place. Non-finite bounds are ignored.
    pub fn update_subtask(
        &mut self,
        index: usize,
        segment: &SubtaskSegment,
    ) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        if !segment.start.is_finite() || !segment.end.is_finite() {
            return Ok(false);
        }
        let renamed = self.corpus.set_subtask_label(episode, index, &segment.label);
        let moved = self
            .corpus
            .set_subtask_bounds(episode, index, segment.start, segment.end);
        Ok(renamed && moved)
    }

    pub fn update_high_level(
        &mut self,
        index: usize,
        segment: HighLevelSegment,
    ) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        match self.corpus.high_level_mut(episode, index) {
            Some(slot) => {
                *slot = segment;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn update_qa_label(&mut self, index: usize, label: QaLabel) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        match self.corpus.qa_label_mut(episode, index) {
            Some(slot) => {
                *slot = label;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_subtask(&mut self, index: usize) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        Ok(self.corpus.remove_subtask(episode, index).is_some())
    }

    pub fn delete_high_level(&mut self, index: usize) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        Ok(self.corpus.remove_high_level(episode, index).is_some())
    }

    pub fn delete_qa_label(&mut self, index: usize) -> Result<bool, SessionError> {
        let episode = self.require_unlocked_active()?;
        Ok(self.corpus.remove_qa_label(episode, index).is_some())
    }

    /// Fill the subtask draft's start or end from the playback position.
    pub fn stamp_subtask_time(&mut self, end: bool) {
        let text = crate::annotations::drafts::format_seconds(self.current_time());
        if end {
            self.drafts.subtask.end = text;
        } else {
            self.drafts.subtask.start = text;
        }
    }

    pub fn stamp_high_level_time(&mut self, end: bool) {
        let text = crate::annotations::drafts::format_seconds(self.current_time());
        if end {
            self.drafts.high_level.end = text;
        } else {
            self.drafts.high_level.start = text;
        }
    }

    pub fn stamp_qa_frame(&mut self) {
        self.drafts.qa.frame_idx = self.current_frame().to_string();
    }
}
