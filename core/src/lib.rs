//! Variable synchronization client for GitLab CI projects.
//!
//! Keeps a local set of named configuration values in sync with the CI
//! variables of a remote project reachable through the paginated `api/v4`
//! REST surface. Existing operator-set values are left untouched unless the
//! caller explicitly asks for an overwrite.
//!
//! Construct a [`GitlabClient`] from a project URL and an API token, then use
//! [`GitlabClient::set_variables`] to apply a desired property set, or the
//! single-variable operations for finer control.

pub mod client;
pub mod error;
pub mod models;
pub mod project;
pub mod sync;
pub mod value;

pub use client::GitlabClient;
pub use error::{KeyFailure, PageFailure, SyncError};
pub use models::Variable;
pub use project::ProjectReference;
pub use sync::SyncAction;
