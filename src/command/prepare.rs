//! Prepare the next release, or fork a new release line.
//!
//! `next` finalizes the existing draft release as the requested version
//! and rolls its milestone, draft release and tracking issue forward under
//! the existing name. `fork` starts a fresh milestone, draft and tracking
//! issue for the requested version and leaves the existing ones alone.
use derive_builder::Builder;
use log::*;
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    ReleaseToolsError, Result, chain,
    cli::{Action, PrepareArgs},
    credentials::TokenSource,
    forge::{
        config::{RemoteConfig, parse_repo_slug},
        github::Github,
        manager::ForgeManager,
        request::{
            CreateIssueRequest, CreateMilestoneRequest, CreateReleaseRequest,
            Issue, Milestone, Release, UpdateIssueRequest,
            UpdateMilestoneRequest, UpdateReleaseRequest,
        },
    },
    reconcile::{self, ConsolePrompt, Decision, Prompt},
    references,
};

static CHECKED_BOX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[x\]").unwrap());

/// Body of every newly created draft release.
pub const NEXT_RELEASE_BODY: &str = r#"
### Changed

### New
* Issue Title (#12345)

### Fixed

### Additional Items

### With special thanks for contributions to this release from:
* Real Name - @githubhandle
"#;

/// Execute prepare-release from parsed CLI arguments.
pub async fn execute(args: &PrepareArgs) -> Result<()> {
    let (owner, repo) = parse_repo_slug(&args.repo, Some(&args.owner))?;
    let token = TokenSource::new(&args.token_file).access_token()?;

    let remote = RemoteConfig::github(&owner, &repo, token, args.dry_run);
    let forge = Github::new(remote)?;

    let preparer = Preparer::builder()
        .forge(ForgeManager::new(Box::new(forge)))
        .prompt(Box::new(ConsolePrompt))
        .action(args.action)
        .version(args.new_version.clone())
        .existing_release_name(args.existing_release.clone())
        .build()?;

    if preparer.run().await? == Outcome::Halted {
        warn!("release preparation halted: nothing was changed");
    }

    Ok(())
}

/// Result of a prepare-release run that didn't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Prepared,
    /// The operator rejected a milestone/release mismatch.
    Halted,
}

#[derive(Builder)]
#[builder(pattern = "owned", build_fn(private, name = "_build"))]
pub struct PrepareParams {
    pub forge: ForgeManager,
    pub prompt: Box<dyn Prompt>,
    pub action: Action,
    #[builder(setter(into))]
    pub version: String,
    #[builder(setter(into))]
    pub existing_release_name: String,
}

impl PrepareParamsBuilder {
    pub fn build(self) -> Result<Preparer> {
        let params = self._build().map_err(|e| {
            ReleaseToolsError::InvalidConfig(format!(
                "Failed to build release preparer: {}",
                e
            ))
        })?;
        Ok(Preparer::new(params))
    }
}

pub struct Preparer {
    forge: ForgeManager,
    prompt: Box<dyn Prompt>,
    action: Action,
    version: String,
    existing_release_name: String,
}

impl Preparer {
    pub fn builder() -> PrepareParamsBuilder {
        PrepareParamsBuilder::default()
    }

    pub fn new(params: PrepareParams) -> Self {
        Self {
            forge: params.forge,
            prompt: params.prompt,
            action: params.action,
            version: params.version,
            existing_release_name: params.existing_release_name,
        }
    }

    pub async fn run(&self) -> Result<Outcome> {
        debug!(
            "preparing release: action: {}, version: {}, existing release: {}",
            self.action, self.version, self.existing_release_name
        );

        let existing_milestone = self.existing_milestone().await?;
        let issues = self.issues_in_milestone(&existing_milestone).await?;
        let existing_issue =
            chain::find_release_issue(&issues, &self.existing_release_name)?;
        info!(
            "Found release issue #{}: '{}'",
            existing_issue.number, existing_issue.title
        );

        match self.action {
            Action::Next => {
                self.next(&existing_milestone, &issues, existing_issue).await
            }
            Action::Fork => self.fork(existing_issue).await,
        }
    }

    async fn next(
        &self,
        existing_milestone: &Milestone,
        issues: &[Issue],
        existing_issue: &Issue,
    ) -> Result<Outcome> {
        let next_release_name = &self.existing_release_name;

        info!("Fetching all GitHub releases...");
        let releases = self.forge.list_releases().await?;
        info!("Fetched all GitHub releases");

        let existing_release =
            chain::find_draft_release(&releases, &self.existing_release_name)?;

        let milestone_releases = chain::releases_for_milestone(
            &releases,
            existing_release,
            &self.version,
        );
        let non_release_issues =
            chain::exclude_release_issues(issues, &milestone_releases);
        let referenced = references::issue_numbers_in(
            milestone_releases.iter().map(|r| r.body.as_str()),
        );

        let discrepancies =
            reconcile::cross_reference(&non_release_issues, &referenced);

        if reconcile::confirm(&discrepancies, self.prompt.as_ref()).await?
            == Decision::Halt
        {
            return Ok(Outcome::Halted);
        }

        let next_milestone = if references::is_pre_release(&self.version) {
            existing_milestone.clone()
        } else {
            self.rename_milestone(existing_milestone).await?;
            self.create_next_milestone(next_release_name).await?
        };

        self.update_release(existing_release).await?;
        self.create_next_release(next_release_name).await?;
        self.update_issue(existing_issue, existing_milestone).await?;
        self.create_next_issue(
            existing_issue,
            &next_milestone,
            next_release_name,
        )
        .await?;

        Ok(Outcome::Prepared)
    }

    async fn fork(&self, existing_issue: &Issue) -> Result<Outcome> {
        let next_release_name = &self.version;

        let next_milestone =
            self.create_next_milestone(next_release_name).await?;
        self.create_next_release(next_release_name).await?;
        self.create_next_issue(
            existing_issue,
            &next_milestone,
            next_release_name,
        )
        .await?;

        Ok(Outcome::Prepared)
    }

    async fn existing_milestone(&self) -> Result<Milestone> {
        info!("Fetching milestone '{}'...", self.existing_release_name);
        let milestones = self.forge.list_open_milestones().await?;
        let milestone =
            chain::find_milestone(&milestones, &self.existing_release_name)?
                .clone();
        info!("Fetched milestone '{}'", milestone.title);

        Ok(milestone)
    }

    async fn issues_in_milestone(
        &self,
        milestone: &Milestone,
    ) -> Result<Vec<Issue>> {
        info!("Fetching issues in milestone '{}'...", milestone.title);
        let issues = self.forge.list_milestone_issues(milestone.number).await?;
        info!(
            "Fetched {} issues in milestone '{}'",
            issues.len(),
            milestone.title
        );

        Ok(issues)
    }

    async fn rename_milestone(&self, existing: &Milestone) -> Result<()> {
        info!(
            "Renaming milestone '{}' to '{}'...",
            existing.title, self.version
        );
        let updated = self
            .forge
            .update_milestone(UpdateMilestoneRequest {
                number: existing.number,
                title: self.version.clone(),
            })
            .await?;
        info!(
            "Renamed milestone '{}' to '{}'",
            existing.title, updated.title
        );

        Ok(())
    }

    async fn create_next_milestone(&self, title: &str) -> Result<Milestone> {
        info!("Creating new milestone '{title}'...");
        let milestone = self
            .forge
            .create_milestone(CreateMilestoneRequest {
                title: title.to_string(),
            })
            .await?;
        info!("Created new milestone '{}'", milestone.title);

        Ok(milestone)
    }

    async fn update_release(&self, existing: &Release) -> Result<()> {
        info!(
            "Renaming GitHub release '{}' to '{}'...",
            existing.name, self.version
        );
        let updated = self
            .forge
            .update_release(UpdateReleaseRequest {
                release_id: existing.id,
                name: self.version.clone(),
                tag_name: self.version.clone(),
                prerelease: references::is_pre_release(&self.version),
            })
            .await?;
        info!(
            "Renamed GitHub release '{}' to '{}'",
            existing.name, updated.name
        );

        Ok(())
    }

    async fn create_next_release(&self, name: &str) -> Result<()> {
        info!("Creating new GitHub release '{name}'...");
        let release = self
            .forge
            .create_release(CreateReleaseRequest {
                tag_name: name.to_string(),
                name: name.to_string(),
                body: NEXT_RELEASE_BODY.trim().to_string(),
                draft: true,
            })
            .await?;
        info!("Created new GitHub release '{}'", release.name);

        Ok(())
    }

    async fn update_issue(
        &self,
        existing: &Issue,
        milestone: &Milestone,
    ) -> Result<()> {
        let title = chain::release_issue_title(&self.version);
        info!(
            "Renaming release issue '{}' to '{}'...",
            existing.title, title
        );
        let updated = self
            .forge
            .update_issue(UpdateIssueRequest {
                number: existing.number,
                title,
                milestone: milestone.number,
            })
            .await?;
        info!(
            "Renamed release issue '{}' to '{}'",
            existing.title, updated.title
        );

        Ok(())
    }

    async fn create_next_issue(
        &self,
        existing: &Issue,
        milestone: &Milestone,
        next_release_name: &str,
    ) -> Result<()> {
        let title = chain::release_issue_title(next_release_name);
        info!("Creating new release issue '{title}'...");
        let issue = self
            .forge
            .create_issue(CreateIssueRequest {
                title: title.clone(),
                body: reset_checkboxes(&existing.body),
                milestone: milestone.number,
                labels: existing.labels.clone(),
            })
            .await?;
        info!("Created new release issue #{}: '{}'", issue.number, title);

        Ok(())
    }
}

/// Uncheck every task-list box in an issue body.
pub fn reset_checkboxes(body: &str) -> String {
    CHECKED_BOX_REGEX.replace_all(body, "[ ]").into_owned()
}
