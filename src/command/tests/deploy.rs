//! Tests for the deploy workflow.
//!
//! Tests for:
//! - Resolving the release and failing when it's missing
//! - Uploading and pushing every package artifact
//! - Commenting only on issues not already shipped by a pre-release
//! - Dry-run suppression of uploads, pushes and comments

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
    sync::{Arc, Mutex},
};
use tempfile::TempDir;

use super::common::*;
use crate::{
    ReleaseToolsError,
    command::deploy::{Deployer, newly_referenced_issues, released_comment},
    forge::request::Asset,
    registry::{MockRegistry, RegistryManager},
    test_helpers::{issue, release},
};

const SOURCE: &str = "https://nuget.example/v3/index.json";

fn artifacts_folder(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fs::write(dir.path().join(name), name.as_bytes()).unwrap();
    }
    dir
}

fn sample_releases() -> Vec<crate::forge::request::Release> {
    vec![
        release(1, "2.1.0", "* One (#1, #2)\n* Three (#3)", false),
        release(2, "2.1.0-beta1", "* One (#1)", true),
        release(3, "2.2.0", "* Four (#4)", false),
    ]
}

fn registry(dry_run: bool, expected_pushes: usize) -> RegistryManager {
    let mut registry = MockRegistry::new();
    registry.expect_source().returning(|| SOURCE.into());
    registry
        .expect_push()
        .times(expected_pushes)
        .returning(|_| Ok(()));
    RegistryManager::new(Box::new(registry), dry_run)
}

fn deployer(
    forge: crate::forge::manager::ForgeManager,
    registry: RegistryManager,
    release_name: &str,
    folder: &Path,
) -> Deployer {
    Deployer::builder()
        .forge(forge)
        .registry(registry)
        .release_name(release_name)
        .artifacts_folder(folder)
        .build()
        .unwrap()
}

#[test_log::test(tokio::test)]
async fn deploy_uploads_pushes_and_comments_on_new_issues() {
    let dir = artifacts_folder(&[
        "Widgets.2.1.0.nupkg",
        "Widgets.Analyzers.2.1.0.nupkg",
        "build.log",
    ]);

    let mut mock_forge = mock_forge(false);
    mock_forge
        .expect_list_releases()
        .times(1)
        .returning(|| Ok(sample_releases()));
    mock_forge
        .expect_upload_asset()
        .withf(|req| {
            req.release_id == 1 && req.data == req.file_name.as_bytes()
        })
        .times(2)
        .returning(|req| {
            Ok(Asset {
                name: req.file_name,
            })
        });
    mock_forge
        .expect_create_comment()
        .withf(|req| {
            (req.issue_number == 2 || req.issue_number == 3)
                && req.body.contains(
                    "(https://github.com/test/repo/releases/tag/2.1.0)",
                )
        })
        .times(2)
        .returning(|_| Ok(()));

    let summary = deployer(
        forge_manager(mock_forge),
        registry(false, 2),
        "2.1.0",
        dir.path(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(
        summary.uploaded,
        vec!["Widgets.2.1.0.nupkg", "Widgets.Analyzers.2.1.0.nupkg"]
    );
    assert_eq!(summary.pushed, summary.uploaded);
    assert_eq!(summary.commented, BTreeSet::from([2, 3]));
}

#[tokio::test]
async fn deploy_pre_release_comments_on_all_its_issues() {
    let dir = artifacts_folder(&["Widgets.2.1.0-beta1.nupkg"]);

    let mut mock_forge = mock_forge(false);
    mock_forge
        .expect_list_releases()
        .returning(|| Ok(sample_releases()));
    mock_forge
        .expect_upload_asset()
        .withf(|req| req.release_id == 2)
        .times(1)
        .returning(|req| {
            Ok(Asset {
                name: req.file_name,
            })
        });
    mock_forge
        .expect_create_comment()
        .withf(|req| req.issue_number == 1)
        .times(1)
        .returning(|_| Ok(()));

    let summary = deployer(
        forge_manager(mock_forge),
        registry(false, 1),
        "2.1.0-beta1",
        dir.path(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(summary.commented, BTreeSet::from([1]));
}

#[tokio::test]
async fn deploy_fails_when_release_is_missing() {
    let dir = artifacts_folder(&["Widgets.3.0.0.nupkg"]);

    let mut mock_forge = mock_forge(false);
    mock_forge
        .expect_list_releases()
        .returning(|| Ok(sample_releases()));
    mock_forge.expect_upload_asset().times(0);
    mock_forge.expect_create_comment().times(0);

    let result = deployer(
        forge_manager(mock_forge),
        registry(false, 0),
        "3.0.0",
        dir.path(),
    )
    .run()
    .await;

    assert!(matches!(result, Err(ReleaseToolsError::NotFound { .. })));
}

#[tokio::test]
async fn deploy_fails_without_artifacts() {
    let dir = artifacts_folder(&["build.log"]);

    let mut mock_forge = mock_forge(false);
    mock_forge
        .expect_list_releases()
        .returning(|| Ok(sample_releases()));
    mock_forge.expect_upload_asset().times(0);
    mock_forge.expect_create_comment().times(0);

    let result = deployer(
        forge_manager(mock_forge),
        registry(false, 0),
        "2.1.0",
        dir.path(),
    )
    .run()
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("any artifacts to publish"));
}

#[tokio::test]
async fn deploy_aborts_when_upload_fails() {
    let dir = artifacts_folder(&["Widgets.2.1.0.nupkg"]);

    let mut mock_forge = mock_forge(false);
    mock_forge
        .expect_list_releases()
        .returning(|| Ok(sample_releases()));
    mock_forge
        .expect_upload_asset()
        .times(1)
        .returning(|_| Err(ReleaseToolsError::forge("502 bad gateway")));
    mock_forge.expect_create_comment().times(0);

    let result = deployer(
        forge_manager(mock_forge),
        registry(false, 0),
        "2.1.0",
        dir.path(),
    )
    .run()
    .await;

    assert!(matches!(result, Err(ReleaseToolsError::ForgeError(_))));
}

#[tokio::test]
async fn deploy_comments_on_every_issue_before_reporting_failure() {
    let dir = artifacts_folder(&["Widgets.2.1.0.nupkg"]);
    let posted = Arc::new(Mutex::new(BTreeSet::<u64>::new()));

    let mut mock_forge = mock_forge(false);
    mock_forge
        .expect_list_releases()
        .returning(|| Ok(sample_releases()));
    mock_forge.expect_upload_asset().times(1).returning(|req| {
        Ok(Asset {
            name: req.file_name,
        })
    });
    let recorded = Arc::clone(&posted);
    mock_forge
        .expect_create_comment()
        .times(2)
        .returning(move |req| {
            if req.issue_number == 2 {
                return Err(ReleaseToolsError::forge("comment on #2 failed"));
            }
            recorded.lock().unwrap().insert(req.issue_number);
            Ok(())
        });

    let result = deployer(
        forge_manager(mock_forge),
        registry(false, 1),
        "2.1.0",
        dir.path(),
    )
    .run()
    .await;

    assert!(matches!(result, Err(ReleaseToolsError::ForgeError(_))));
    assert_eq!(*posted.lock().unwrap(), BTreeSet::from([3]));
}

#[tokio::test]
async fn dry_run_deploy_only_reads() {
    let dir = artifacts_folder(&["Widgets.2.1.0.nupkg"]);

    let mut mock_forge = mock_forge(true);
    mock_forge
        .expect_list_releases()
        .times(1)
        .returning(|| Ok(sample_releases()));
    mock_forge.expect_upload_asset().times(0);
    mock_forge.expect_create_comment().times(0);
    mock_forge
        .expect_get_issue()
        .times(2)
        .returning(|number| Ok(issue(number, "Shipped issue")));

    let summary = deployer(
        forge_manager(mock_forge),
        registry(true, 0),
        "2.1.0",
        dir.path(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(summary.uploaded, vec!["Widgets.2.1.0.nupkg"]);
    assert_eq!(summary.commented, BTreeSet::from([2, 3]));
}

#[test]
fn final_release_excludes_issues_shipped_in_pre_releases() {
    let releases = vec![
        release(1, "2.1.0", "(#1, #2) (#3)", false),
        release(2, "2.1.0-beta1", "(#1)", true),
        release(3, "2.1.0-beta2", "(#2)", true),
        release(4, "2.0.0-beta1", "(#3)", true),
    ];

    assert_eq!(
        newly_referenced_issues(&releases[0], &releases),
        BTreeSet::from([3])
    );
    assert_eq!(
        newly_referenced_issues(&releases[2], &releases),
        BTreeSet::from([2])
    );
}

#[test]
fn renders_released_comment() {
    let comment = released_comment(&remote_config(), "2.1.0").unwrap();

    assert_eq!(
        comment,
        "This change has been released as part of [repo 2.1.0](https://github.com/test/repo/releases/tag/2.1.0)."
    );
}
