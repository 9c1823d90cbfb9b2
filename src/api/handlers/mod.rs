//! API request handlers.

/// Chat handler.
pub mod chat;
/// Static chat page.
pub mod ui;
