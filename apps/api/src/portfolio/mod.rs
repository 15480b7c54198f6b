// Portfolio assembly pipeline and its service layer.
// assembly/render are pure over a TextGenerator; store/session/jobs own persistence.

pub mod assembly;
pub mod handlers;
pub mod jobs;
pub mod render;
pub mod session;
pub mod store;
