//! The two release workflow commands.
//!
//! - **deploy**: upload a release's packages to the GitHub release and the
//!   package registry, then comment on every issue it newly ships.
//! - **prepare**: reconcile a milestone with its release notes and roll the
//!   milestone, draft release and tracking issue forward (`next`), or start
//!   a parallel release line (`fork`).
//!
//! Both run as a straight line of forge calls. Any failure aborts the run
//! and leaves already completed steps in place. Both honor `--dry-run`
//! through the forge and registry managers.

/// Package and release-asset publishing.
pub mod deploy;

/// Milestone, draft release and tracking issue roll-over.
pub mod prepare;
