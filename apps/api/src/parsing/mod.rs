//! Free-text to structured-record parsing for chat-collected answers.

pub mod chat;
pub mod records;
