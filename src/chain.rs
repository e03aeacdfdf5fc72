//! Grouping releases that belong to the same version line, and exact-name
//! lookups over fetched releases, milestones and issues.
use crate::{
    ReleaseToolsError, Result,
    forge::request::{Issue, Milestone, Release},
    references::base_name,
};

/// Title of the tracking issue for a release.
pub fn release_issue_title(release_name: &str) -> String {
    format!("Release {release_name}")
}

/// Pre-releases whose notes were already announced before `release` ships.
///
/// A pre-release never inherits history. A final release is preceded by
/// every pre-release sharing its base name.
pub fn contributing_pre_releases<'a>(
    release: &Release,
    releases: &'a [Release],
) -> Vec<&'a Release> {
    if release.prerelease {
        return vec![];
    }

    let base = base_name(&release.name);

    releases
        .iter()
        .filter(|r| r.prerelease && base_name(&r.name) == base)
        .collect()
}

/// Releases whose notes feed the milestone being closed out by `version`.
///
/// Includes `existing` plus every release named with the version root,
/// compared case-insensitively.
pub fn releases_for_milestone<'a>(
    releases: &'a [Release],
    existing: &'a Release,
    version: &str,
) -> Vec<&'a Release> {
    let root = base_name(version).to_lowercase();
    let mut chain = vec![existing];

    for release in releases {
        if release.name.to_lowercase().starts_with(&root)
            && !chain.iter().any(|r| r.id == release.id)
        {
            chain.push(release);
        }
    }

    chain
}

/// Issues that aren't tracking issues for any release in the chain.
pub fn exclude_release_issues<'a>(
    issues: &'a [Issue],
    chain: &[&Release],
) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| {
            chain
                .iter()
                .all(|r| release_issue_title(&r.name) != issue.title)
        })
        .collect()
}

/// First release with the given name.
pub fn find_release<'a>(
    releases: &'a [Release],
    name: &str,
) -> Result<&'a Release> {
    releases
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| ReleaseToolsError::not_found("release", name))
}

/// The single draft release with the given name.
pub fn find_draft_release<'a>(
    releases: &'a [Release],
    name: &str,
) -> Result<&'a Release> {
    single(
        releases.iter().filter(|r| r.draft && r.name == name),
        "draft release",
        name,
    )
}

/// The single milestone with the given title.
pub fn find_milestone<'a>(
    milestones: &'a [Milestone],
    title: &str,
) -> Result<&'a Milestone> {
    single(
        milestones.iter().filter(|m| m.title == title),
        "open milestone",
        title,
    )
}

/// The single tracking issue for the given release.
pub fn find_release_issue<'a>(
    issues: &'a [Issue],
    release_name: &str,
) -> Result<&'a Issue> {
    let title = release_issue_title(release_name);
    single(
        issues.iter().filter(|i| i.title == title),
        "release issue",
        &title,
    )
}

fn single<'a, T, I>(mut matches: I, kind: &str, name: &str) -> Result<&'a T>
where
    I: Iterator<Item = &'a T>,
{
    let first = matches
        .next()
        .ok_or_else(|| ReleaseToolsError::not_found(kind, name))?;

    let extra = matches.count();
    if extra > 0 {
        return Err(ReleaseToolsError::ambiguous(kind, name, extra + 1));
    }

    Ok(first)
}
