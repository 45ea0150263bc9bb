//! AI plugin actions: settings editors, interactive generation and batches.

use tracing::info;

use super::{AiSettingsSnapshot, EguiController, JobMessage};
use crate::annotations::EpisodeIndex;
use crate::api::{ApiError, Backend, GenerationResult, PromptKind};
use crate::batch::{BatchEvent, run_batch};
use crate::egui_app::state::StatusTone;
use crate::generation::{GenerationKind, GenerationOptions};
use crate::session::BatchFollowUp;

impl EguiController {
    pub fn refresh_ai_status(&mut self) {
        let backend = self.session.backend();
        self.jobs
            .spawn(move || JobMessage::AiStatus(backend.ai_status()));
    }

    pub fn load_ai_settings(&mut self) {
        let backend = self.session.backend();
        self.set_status("Loading AI settings...", StatusTone::Busy);
        self.jobs
            .spawn(move || JobMessage::AiSettingsLoaded(fetch_ai_settings(backend.as_ref())));
    }

    /// Write the config JSON and both prompts back to the server.
    pub fn save_ai_settings(&mut self) {
        let config = match serde_json::from_str::<serde_json::Value>(&self.ui.ai.config_text) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => {
                self.set_status("AI config must be a JSON object", StatusTone::Warning);
                return;
            }
            Err(err) => {
                self.set_status(format!("AI config is not valid JSON: {err}"), StatusTone::Warning);
                return;
            }
        };
        let subtask_prompt = self.ui.ai.subtask_prompt.clone();
        let vqa_prompt = self.ui.ai.vqa_prompt.clone();
        let backend = self.session.backend();
        self.set_status("Saving AI settings...", StatusTone::Busy);
        let draft = AiSettingsSnapshot {
            config,
            subtask_prompt,
            vqa_prompt,
        };
        self.jobs.spawn(move || {
            JobMessage::AiSettingsSaved(store_ai_settings(backend.as_ref(), &draft))
        });
    }

    pub(super) fn on_ai_settings(&mut self, snapshot: AiSettingsSnapshot, saved: bool) {
        self.ui.ai.config_text =
            serde_json::to_string_pretty(&serde_json::Value::Object(snapshot.config))
                .unwrap_or_default();
        self.ui.ai.subtask_prompt = snapshot.subtask_prompt;
        self.ui.ai.vqa_prompt = snapshot.vqa_prompt;
        let text = if saved {
            "AI settings saved"
        } else {
            "AI settings loaded"
        };
        self.set_status(text, StatusTone::Info);
    }

    /// Store the generation parameters edited in the panel.
    pub fn save_generation_params(&mut self) {
        self.persist_settings();
        self.set_status("Generation settings saved", StatusTone::Info);
    }

    fn interactive_options(&mut self) -> Option<GenerationOptions> {
        let text = self.ui.ai.start_time.trim();
        let start_time_s = if text.is_empty() {
            None
        } else {
            match text.parse::<f64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    self.set_status("Start time must be a number of seconds", StatusTone::Warning);
                    return None;
                }
            }
        };
        Some(GenerationOptions {
            mode: self.ui.ai.mode,
            resume_from_last: self.ui.ai.resume_from_last,
            start_time_s,
        })
    }

    /// Fill the start time from the playback position.
    pub fn stamp_generation_start(&mut self) {
        self.ui.ai.start_time = crate::annotations::drafts::format_seconds(self.session.current_time());
    }

    pub fn generate_active(&mut self) {
        let Some(options) = self.interactive_options() else {
            return;
        };
        let kind = self.ui.ai.kind;
        let request = match self.session.generation_request(kind, options) {
            Ok(request) => request,
            Err(err) => {
                self.report_session("Generating", err);
                return;
            }
        };
        let episode = request.episode_index();
        let backend = self.session.backend();
        self.set_status(
            format!("Generating {} for episode {episode}...", kind.label()),
            StatusTone::Busy,
        );
        self.jobs.spawn(move || JobMessage::Generated {
            kind,
            episode,
            result: backend.generate(&request),
        });
    }

    pub(super) fn on_generated(
        &mut self,
        kind: GenerationKind,
        episode: EpisodeIndex,
        result: Result<GenerationResult, ApiError>,
    ) {
        match result {
            Ok(result) => {
                info!(episode, kind = kind.label(), count = result.count, "generation finished");
                self.set_status(
                    format!("Generated {} {} for episode {episode}", result.count, kind.label()),
                    StatusTone::Info,
                );
                self.reload_episode(episode);
            }
            Err(err) => self.report(&format!("Generating {}", kind.label()), err),
        }
    }

    pub fn start_batch(&mut self) {
        let kind = self.ui.ai.kind;
        let selection = self.ui.ai.batch_selection.clone();
        let job = match self.session.start_batch(kind, &selection) {
            Ok(job) => job,
            Err(err) => {
                self.report_session("Starting batch", err);
                return;
            }
        };
        self.persist_settings();
        self.ui.ai.batch_log.clear();
        let backend = self.session.backend();
        let tx = self.jobs.sender();
        let handle = std::thread::spawn(move || {
            run_batch(&*backend, &job.plan, &job.cancel, |event| {
                let _ = tx.send(JobMessage::Batch(event));
            });
        });
        self.jobs.batch_worker = Some(handle);
    }

    pub fn cancel_batch(&mut self) {
        if self.session.cancel_batch() {
            self.set_status("Canceling after the current episode...", StatusTone::Busy);
        }
    }

    pub(super) fn on_batch_event(&mut self, event: BatchEvent) {
        self.ui.ai.record_batch_event(&event);
        if let Some(text) = event.status_text() {
            let tone = match &event {
                BatchEvent::Finished(summary) if !summary.failures.is_empty() => {
                    StatusTone::Warning
                }
                BatchEvent::Finished(_) => StatusTone::Info,
                _ => StatusTone::Busy,
            };
            self.set_status(text, tone);
        }
        if let BatchFollowUp::Reload(episode) = self.session.handle_batch_event(&event) {
            self.reload_episode(episode);
        }
    }
}

fn fetch_ai_settings(backend: &dyn Backend) -> Result<AiSettingsSnapshot, ApiError> {
    Ok(AiSettingsSnapshot {
        config: backend.ai_config()?,
        subtask_prompt: backend.prompt(PromptKind::Subtask)?,
        vqa_prompt: backend.prompt(PromptKind::Vqa)?,
    })
}

fn store_ai_settings(
    backend: &dyn Backend,
    draft: &AiSettingsSnapshot,
) -> Result<AiSettingsSnapshot, ApiError> {
    Ok(AiSettingsSnapshot {
        config: backend.put_ai_config(&draft.config)?,
        subtask_prompt: backend.put_prompt(PromptKind::Subtask, &draft.subtask_prompt)?,
        vqa_prompt: backend.put_prompt(PromptKind::Vqa, &draft.vqa_prompt)?,
    })
}
