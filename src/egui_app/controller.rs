//! Bridges the annotation session to the egui views.
//!
//! The controller is the only owner of [`Session`]. Views call its methods;
//! long-running server calls are pushed onto worker threads and their results
//! applied in [`EguiController::poll_jobs`] on the UI thread.

mod ai;
mod dataset;
mod episode;
mod jobs;
mod offline;
mod polling;

use std::sync::Arc;

use tracing::{error, warn};

use crate::api::HttpBackend;
use crate::config::{self, AppSettings};
use crate::egui_app::state::{AlertState, DatasetFormState, StatusTone, UiState};
use crate::session::{Session, SessionError};

use offline::NoServer;

pub(crate) use jobs::{AiSettingsSnapshot, ControllerJobs, FetchPurpose, JobMessage};

pub struct EguiController {
    pub ui: UiState,
    session: Session,
    settings: AppSettings,
    jobs: ControllerJobs,
}

impl EguiController {
    /// Build the controller from saved settings.
    ///
    /// Unreadable settings do not stop startup: defaults are used and an
    /// alert explains what happened.
    pub fn new() -> Self {
        let (settings, alert) = match config::load_or_default() {
            Ok(settings) => (settings, None),
            Err(err) => {
                error!(error = %err, "failed to load settings");
                (
                    AppSettings::default(),
                    Some(AlertState {
                        title: "Settings could not be loaded".into(),
                        message: format!("{err}\n\nDefaults are in use until settings are saved."),
                    }),
                )
            }
        };
        let mut controller = Self::with_settings(settings);
        controller.ui.alert = alert;
        controller
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        let mut ui = UiState::default();
        ui.dataset_form = DatasetFormState::from_settings(&settings.server.base_url, &settings.dataset);
        let backend = HttpBackend::new(&settings.server.base_url, settings.server.http_settings())
            .or_else(|err| {
                warn!(error = %err, "invalid server url in settings, using default");
                let fallback = config::ServerSettings::default();
                HttpBackend::new(&fallback.base_url, fallback.http_settings())
            });
        let mut session = match backend {
            Ok(backend) => Session::new(Arc::new(backend)),
            Err(err) => {
                ui.alert = Some(AlertState {
                    title: "Server address is invalid".into(),
                    message: err.to_string(),
                });
                Session::new(Arc::new(NoServer))
            }
        };
        session.params = settings.generation_params();
        session.batch_pause = settings.batch.pause();
        Self {
            ui,
            session,
            settings,
            jobs: ControllerJobs::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Whether any background work is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.jobs.is_busy()
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }

    pub fn dismiss_alert(&mut self) {
        self.ui.alert = None;
    }

    /// Report a failed action in the status bar.
    fn report(&mut self, action: &str, err: impl std::fmt::Display) {
        warn!(action, error = %err, "action failed");
        self.set_status(format!("{action} failed: {err}"), StatusTone::Error);
    }

    fn report_session(&mut self, action: &str, err: SessionError) {
        match err {
            SessionError::EpisodeLocked(_) | SessionError::BatchBusy => {
                self.set_status(err.to_string(), StatusTone::Warning)
            }
            other => self.report(action, other),
        }
    }

    /// Persist settings, reporting but not failing on errors.
    fn persist_settings(&mut self) {
        self.settings.set_generation_params(&self.session.params);
        if let Err(err) = config::save(&self.settings) {
            self.report("Saving settings", err);
        }
    }
}

impl Default for EguiController {
    fn default() -> Self {
        Self::new()
    }
}
