//! Common test utilities for command tests.

use crate::{
    forge::{config::RemoteConfig, manager::ForgeManager, traits::MockForge},
    test_helpers::create_test_remote_config,
};

/// Adds the remote config expectation every manager construction needs.
pub fn mock_forge(dry_run: bool) -> MockForge {
    let mut mock_forge = MockForge::new();
    mock_forge
        .expect_remote_config()
        .returning(move || create_test_remote_config(dry_run));
    mock_forge
}

/// Wraps a configured mock forge in a manager.
pub fn forge_manager(mock_forge: MockForge) -> ForgeManager {
    ForgeManager::new(Box::new(mock_forge))
}

/// Remote config matching the one returned by [`mock_forge`].
pub fn remote_config() -> RemoteConfig {
    create_test_remote_config(false)
}
