//! Interface to the issue and release tracking forge.
//!
//! Provides token-based authentication, release, milestone and issue
//! management through a common trait, with dry-run handled in one place by
//! the manager.

/// Configuration and authentication for the forge connection.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// Dry-run aware wrapper around a forge implementation.
pub mod manager;

/// Request and response types for releases, milestones and issues.
pub mod request;

/// Common trait for forge platform abstraction.
pub mod traits;
