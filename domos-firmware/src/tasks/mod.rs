//! Embassy async tasks

pub mod session;

pub use session::session_task;
