pub mod analyze;
pub mod history;
pub mod optimize;
pub mod status;
pub mod tasks;
pub mod version;
pub mod watch;
