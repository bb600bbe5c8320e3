pub mod common;
pub mod config;
pub mod diff;
pub mod pull;
pub mod push;
pub mod status;

pub use common::SyncOptions;
pub use config::Config;
pub use diff::Diff;
pub use pull::Pull;
pub use push::Push;
pub use status::Status;
