//! Helpers for driving a real Tower Auth server over HTTPS from tests.

pub mod daemon;
pub mod http_client;

pub use daemon::*;
pub use http_client::*;
