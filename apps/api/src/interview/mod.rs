// Mock interview sessions: persistence and HTTP surface.
// Question, score and feedback generation lives in generation::interview.

pub mod handlers;
pub mod store;
