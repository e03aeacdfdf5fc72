//! Common test helper functions shared across test modules.
use secrecy::SecretString;

use crate::forge::{
    config::RemoteConfig,
    request::{Issue, Milestone, MilestoneState, Release},
};

/// Creates a test RemoteConfig for github.com/test/repo.
pub fn create_test_remote_config(dry_run: bool) -> RemoteConfig {
    RemoteConfig::github(
        "test",
        "repo",
        SecretString::from("test-token".to_string()),
        dry_run,
    )
}

/// Creates a published release snapshot.
pub fn release(id: u64, name: &str, body: &str, prerelease: bool) -> Release {
    Release {
        id,
        name: name.to_string(),
        tag_name: name.to_string(),
        body: body.to_string(),
        prerelease,
        draft: false,
    }
}

/// Creates a draft release snapshot.
pub fn draft_release(id: u64, name: &str, body: &str) -> Release {
    Release {
        draft: true,
        ..release(id, name, body, false)
    }
}

/// Creates an open issue with no labels or milestone.
pub fn issue(number: u64, title: &str) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        ..Issue::default()
    }
}

/// Creates an open milestone.
pub fn milestone(number: u64, title: &str) -> Milestone {
    Milestone {
        number,
        title: title.to_string(),
        state: MilestoneState::Open,
    }
}
