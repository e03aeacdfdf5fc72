//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    ReleaseToolsError, Result,
    forge::{
        config::{DEFAULT_PAGE_SIZE, RemoteConfig, UPLOAD_TIMEOUT_SECS},
        request::{
            Asset, CreateCommentRequest, CreateIssueRequest,
            CreateMilestoneRequest, CreateReleaseRequest, Issue, Milestone,
            Release, UpdateIssueRequest, UpdateMilestoneRequest,
            UpdateReleaseRequest, UploadAssetRequest,
        },
        traits::Forge,
    },
};

mod types;

use types::{
    GithubIssue, GithubMilestone, IssueUpdateBody, MilestoneBody,
    NewIssueBody,
};

/// GitHub forge implementation using Octocrab for releases, milestones,
/// issues and comments.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_base_uri();
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }

    fn repo_route(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_uri, self.config.owner, self.config.repo, path
        )
    }

    /// Fetch every page of a repository listing endpoint.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let route = self.repo_route(path);
        let page_size = usize::from(DEFAULT_PAGE_SIZE);
        let mut items = vec![];
        let mut page = 1;

        loop {
            let mut params = filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<Vec<(String, String)>>();
            params.push(("per_page".into(), page_size.to_string()));
            params.push(("page".into(), page.to_string()));

            let batch: Vec<T> =
                self.instance.get(&route, Some(&params)).await?;

            debug!("fetched page {page} of {path}: {} items", batch.len());

            let last_page = batch.len() < page_size;
            items.extend(batch);

            if last_page {
                break;
            }

            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        let page = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .list()
            .per_page(DEFAULT_PAGE_SIZE)
            .send()
            .await?;

        let releases = self.instance.all_pages(page).await?;

        Ok(releases.into_iter().map(Release::from).collect())
    }

    async fn update_release(
        &self,
        req: UpdateReleaseRequest,
    ) -> Result<Release> {
        let release = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .update(req.release_id)
            .name(&req.name)
            .tag_name(&req.tag_name)
            .prerelease(req.prerelease)
            .send()
            .await?;

        Ok(Release::from(release))
    }

    async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release> {
        let release = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(&req.tag_name)
            .name(&req.name)
            .body(&req.body)
            .draft(req.draft)
            .send()
            .await?;

        Ok(Release::from(release))
    }

    async fn upload_asset(&self, req: UploadAssetRequest) -> Result<Asset> {
        let repos = self.instance.repos(&self.config.owner, &self.config.repo);
        let releases = repos.releases();

        let upload = releases
            .upload_asset(
                req.release_id,
                &req.file_name,
                bytes::Bytes::from(req.data),
            )
            .send();

        let asset = tokio::time::timeout(
            Duration::from_secs(UPLOAD_TIMEOUT_SECS),
            upload,
        )
        .await
        .map_err(|_| ReleaseToolsError::UploadTimeout {
            file: req.file_name.clone(),
            seconds: UPLOAD_TIMEOUT_SECS,
        })??;

        Ok(Asset { name: asset.name })
    }

    async fn list_open_milestones(&self) -> Result<Vec<Milestone>> {
        let milestones: Vec<GithubMilestone> = self
            .get_all_pages("milestones", &[("state", "open".to_string())])
            .await?;

        Ok(milestones.into_iter().map(Milestone::from).collect())
    }

    async fn update_milestone(
        &self,
        req: UpdateMilestoneRequest,
    ) -> Result<Milestone> {
        let endpoint = self.repo_route(&format!("milestones/{}", req.number));
        let body = MilestoneBody { title: &req.title };

        let milestone: GithubMilestone =
            self.instance.patch(endpoint, Some(&body)).await?;

        Ok(Milestone::from(milestone))
    }

    async fn create_milestone(
        &self,
        req: CreateMilestoneRequest,
    ) -> Result<Milestone> {
        let endpoint = self.repo_route("milestones");
        let body = MilestoneBody { title: &req.title };

        let milestone: GithubMilestone =
            self.instance.post(endpoint, Some(&body)).await?;

        Ok(Milestone::from(milestone))
    }

    async fn list_milestone_issues(
        &self,
        milestone: u64,
    ) -> Result<Vec<Issue>> {
        let issues: Vec<GithubIssue> = self
            .get_all_pages(
                "issues",
                &[
                    ("milestone", milestone.to_string()),
                    ("state", "all".to_string()),
                ],
            )
            .await?;

        Ok(issues.into_iter().map(Issue::from).collect())
    }

    async fn get_issue(&self, number: u64) -> Result<Issue> {
        let endpoint = self.repo_route(&format!("issues/{number}"));

        let issue: GithubIssue =
            self.instance.get(endpoint, None::<&()>).await?;

        Ok(Issue::from(issue))
    }

    async fn update_issue(&self, req: UpdateIssueRequest) -> Result<Issue> {
        let endpoint = self.repo_route(&format!("issues/{}", req.number));
        let body = IssueUpdateBody {
            title: &req.title,
            milestone: req.milestone,
        };

        let issue: GithubIssue =
            self.instance.patch(endpoint, Some(&body)).await?;

        Ok(Issue::from(issue))
    }

    async fn create_issue(&self, req: CreateIssueRequest) -> Result<Issue> {
        let endpoint = self.repo_route("issues");
        let body = NewIssueBody {
            title: &req.title,
            body: &req.body,
            milestone: req.milestone,
            labels: &req.labels,
        };

        let issue: GithubIssue =
            self.instance.post(endpoint, Some(&body)).await?;

        Ok(Issue::from(issue))
    }

    async fn create_comment(&self, req: CreateCommentRequest) -> Result<()> {
        self.instance
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(req.issue_number, &req.body)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::request::MilestoneState;

    #[test]
    fn converts_issue_payload() {
        let payload = r#"{
            "number": 42,
            "title": "Release 2.1.0",
            "body": "- [x] update docs",
            "labels": [{"name": "build"}, {"name": "documentation"}],
            "milestone": {"number": 7, "title": "vNext", "state": "open"}
        }"#;

        let issue: GithubIssue = serde_json::from_str(payload).unwrap();
        let issue = Issue::from(issue);

        assert_eq!(issue.number, 42);
        assert_eq!(issue.title, "Release 2.1.0");
        assert_eq!(issue.body, "- [x] update docs");
        assert_eq!(issue.labels, vec!["build", "documentation"]);
        assert_eq!(issue.milestone, Some(7));
    }

    #[test]
    fn converts_issue_payload_with_null_fields() {
        let payload = r#"{
            "number": 3,
            "title": "Something broke",
            "body": null,
            "labels": [],
            "milestone": null
        }"#;

        let issue: GithubIssue = serde_json::from_str(payload).unwrap();
        let issue = Issue::from(issue);

        assert!(issue.body.is_empty());
        assert!(issue.labels.is_empty());
        assert_eq!(issue.milestone, None);
    }

    #[test]
    fn converts_milestone_state() {
        let open: GithubMilestone = serde_json::from_str(
            r#"{"number": 1, "title": "vNext", "state": "open"}"#,
        )
        .unwrap();
        let closed: GithubMilestone = serde_json::from_str(
            r#"{"number": 2, "title": "2.0.0", "state": "closed"}"#,
        )
        .unwrap();

        assert_eq!(Milestone::from(open).state, MilestoneState::Open);
        assert_eq!(Milestone::from(closed).state, MilestoneState::Closed);
    }
}
