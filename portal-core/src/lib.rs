//! portal-core: Shared plumbing for the document portal client.
pub mod config;
pub mod error;
pub mod observability;
