//! Library exports for the annotation UI, tests and benchmarks.
/// Annotation records, the label index and the local corpus.
pub mod annotations;
/// Typed client for the annotation server.
pub mod api;
/// Application directory resolution.
pub mod app_dirs;
/// Batch AI generation over many episodes.
pub mod batch;
/// Persisted settings.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// AI generation parameters and request building.
pub mod generation;
/// Blocking HTTP agent setup.
pub mod http_client;
/// File logging setup.
pub mod logging;
/// Video playback position tracking.
pub mod playback;
/// The dataset session controller.
pub mod session;
/// Timeline block layout.
pub mod timeline;
