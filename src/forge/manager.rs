//! Manager that wraps forge implementations
use log::*;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            Asset, CreateCommentRequest, CreateIssueRequest,
            CreateMilestoneRequest, CreateReleaseRequest, Issue, Milestone,
            MilestoneState, Release, UpdateIssueRequest,
            UpdateMilestoneRequest, UpdateReleaseRequest, UploadAssetRequest,
        },
        traits::Forge,
    },
};

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> &RemoteConfig {
        &self.remote_config
    }

    pub fn dry_run(&self) -> bool {
        self.remote_config.dry_run
    }

    pub async fn list_releases(&self) -> Result<Vec<Release>> {
        self.forge.list_releases().await
    }

    pub async fn list_open_milestones(&self) -> Result<Vec<Milestone>> {
        self.forge.list_open_milestones().await
    }

    pub async fn list_milestone_issues(
        &self,
        milestone: u64,
    ) -> Result<Vec<Issue>> {
        debug!("listing issues for milestone number: {milestone}");
        self.forge.list_milestone_issues(milestone).await
    }

    pub async fn get_issue(&self, number: u64) -> Result<Issue> {
        self.forge.get_issue(number).await
    }

    pub async fn update_release(
        &self,
        req: UpdateReleaseRequest,
    ) -> Result<Release> {
        if self.remote_config.dry_run {
            warn!("dry_run: would update release: req: {:#?}", req);
            return Ok(Release {
                id: req.release_id,
                name: req.name,
                tag_name: req.tag_name,
                prerelease: req.prerelease,
                ..Release::default()
            });
        }

        self.forge.update_release(req).await
    }

    pub async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create release: req: {:#?}", req);
            return Ok(Release {
                id: 0,
                name: req.name,
                tag_name: req.tag_name,
                body: req.body,
                draft: req.draft,
                prerelease: false,
            });
        }

        self.forge.create_release(req).await
    }

    pub async fn upload_asset(&self, req: UploadAssetRequest) -> Result<Asset> {
        if self.remote_config.dry_run {
            warn!("dry_run: would upload release asset: req: {:#?}", req);
            return Ok(Asset {
                name: req.file_name,
            });
        }

        self.forge.upload_asset(req).await
    }

    pub async fn update_milestone(
        &self,
        req: UpdateMilestoneRequest,
    ) -> Result<Milestone> {
        if self.remote_config.dry_run {
            warn!("dry_run: would update milestone: req: {:#?}", req);
            return Ok(Milestone {
                number: req.number,
                title: req.title,
                state: MilestoneState::Open,
            });
        }

        self.forge.update_milestone(req).await
    }

    pub async fn create_milestone(
        &self,
        req: CreateMilestoneRequest,
    ) -> Result<Milestone> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create milestone: req: {:#?}", req);
            return Ok(Milestone {
                number: 0,
                title: req.title,
                state: MilestoneState::Open,
            });
        }

        self.forge.create_milestone(req).await
    }

    pub async fn update_issue(&self, req: UpdateIssueRequest) -> Result<Issue> {
        if self.remote_config.dry_run {
            warn!("dry_run: would update issue: req: {:#?}", req);
            return Ok(Issue {
                number: req.number,
                title: req.title,
                milestone: Some(req.milestone),
                ..Issue::default()
            });
        }

        self.forge.update_issue(req).await
    }

    pub async fn create_issue(&self, req: CreateIssueRequest) -> Result<Issue> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create issue: req: {:#?}", req);
            return Ok(Issue {
                number: 0,
                title: req.title,
                body: req.body,
                labels: req.labels,
                milestone: Some(req.milestone),
            });
        }

        self.forge.create_issue(req).await
    }

    pub async fn create_comment(
        &self,
        req: CreateCommentRequest,
    ) -> Result<()> {
        if self.remote_config.dry_run {
            let issue = self.forge.get_issue(req.issue_number).await?;
            warn!(
                "dry_run: would comment on issue #{} '{}': {}",
                issue.number, issue.title, req.body
            );
            return Ok(());
        }

        self.forge.create_comment(req).await
    }
}
