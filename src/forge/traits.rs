//! Traits related to the remote release-tracking forge
use async_trait::async_trait;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            Asset, CreateCommentRequest, CreateIssueRequest,
            CreateMilestoneRequest, CreateReleaseRequest, Issue, Milestone,
            Release, UpdateIssueRequest, UpdateMilestoneRequest,
            UpdateReleaseRequest, UploadAssetRequest,
        },
    },
};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    async fn list_releases(&self) -> Result<Vec<Release>>;
    async fn update_release(
        &self,
        req: UpdateReleaseRequest,
    ) -> Result<Release>;
    async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release>;
    async fn upload_asset(&self, req: UploadAssetRequest) -> Result<Asset>;
    async fn list_open_milestones(&self) -> Result<Vec<Milestone>>;
    async fn update_milestone(
        &self,
        req: UpdateMilestoneRequest,
    ) -> Result<Milestone>;
    async fn create_milestone(
        &self,
        req: CreateMilestoneRequest,
    ) -> Result<Milestone>;
    async fn list_milestone_issues(&self, milestone: u64) -> Result<Vec<Issue>>;
    async fn get_issue(&self, number: u64) -> Result<Issue>;
    async fn update_issue(&self, req: UpdateIssueRequest) -> Result<Issue>;
    async fn create_issue(&self, req: CreateIssueRequest) -> Result<Issue>;
    async fn create_comment(&self, req: CreateCommentRequest) -> Result<()>;
}
