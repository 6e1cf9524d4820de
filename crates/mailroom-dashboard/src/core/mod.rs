//! Cross-screen primitives: forms, notifications, session, and navigation.

pub mod forms;
pub mod notify;
pub mod session;
pub mod shell;
