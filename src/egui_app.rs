/// Background jobs and actions driven by the UI.
pub mod controller;
/// Plain UI state shared between the controller and the renderer.
pub mod state;
/// egui rendering.
pub mod ui;
