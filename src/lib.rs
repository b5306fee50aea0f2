//! Claim Publisher
//!
//! Client-side publish pipeline for a claim-based content platform: resolves
//! publish forms into SDK payloads, filters comment threads, keeps client
//! state in a single store and drives the remote APIs.

pub mod api;
pub mod blocked;
pub mod claims;
pub mod comments;
pub mod config;
pub mod context;
pub mod error;
pub mod jobs;
pub mod memberships;
pub mod publish;
pub mod search;
pub mod store;

pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ClientError, ClientResult};
pub use store::{Action, AppState, Store};
