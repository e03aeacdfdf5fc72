//! Deploy a release: upload its packages to the GitHub release and the
//! package registry, then note the release on newly referenced issues.
use derive_builder::Builder;
use futures::future::join_all;
use log::*;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};
use tokio::fs;

use crate::{
    ReleaseToolsError, Result, artifacts, chain,
    cli::DeployArgs,
    credentials::{
        NUGET_API_KEY_ENV, NUGET_SERVER_URL_ENV, NUGET_TOOL_PATH_ENV,
        TokenSource, optional_env_var, required_env_var,
    },
    forge::{
        config::{RemoteConfig, parse_repo_slug},
        github::Github,
        manager::ForgeManager,
        request::{CreateCommentRequest, Release, UploadAssetRequest},
    },
    references,
    registry::{DEFAULT_NUGET_TOOL, NugetRegistry, RegistryManager},
};

const RELEASED_COMMENT_TEMPLATE: &str = concat!(
    "This change has been released as part of ",
    "[{{ repo }} {{ release }}]({{ link }}).",
);

/// Execute deploy from parsed CLI arguments.
pub async fn execute(args: &DeployArgs) -> Result<()> {
    // resolve every credential before any remote call
    let server_url = required_env_var(NUGET_SERVER_URL_ENV)?;
    let api_key = required_env_var(NUGET_API_KEY_ENV)?;
    let tool = optional_env_var(NUGET_TOOL_PATH_ENV)
        .unwrap_or_else(|| DEFAULT_NUGET_TOOL.to_string());
    let (owner, repo) = parse_repo_slug(&args.repo, None)?;
    let token = TokenSource::new(&args.token_file).access_token()?;

    let registry = NugetRegistry::new(&tool, &server_url, api_key.into())?;
    let remote = RemoteConfig::github(&owner, &repo, token, args.dry_run);
    let forge = Github::new(remote)?;

    let deployer = Deployer::builder()
        .forge(ForgeManager::new(Box::new(forge)))
        .registry(RegistryManager::new(Box::new(registry), args.dry_run))
        .release_name(args.tag_name.clone())
        .artifacts_folder(args.artifacts_folder.clone())
        .build()?;

    deployer.run().await?;

    Ok(())
}

/// What a deploy run did, or would have done in dry-run mode.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeploySummary {
    pub uploaded: Vec<String>,
    pub pushed: Vec<String>,
    pub commented: BTreeSet<u64>,
}

#[derive(Builder)]
#[builder(pattern = "owned", build_fn(private, name = "_build"))]
pub struct DeployParams {
    pub forge: ForgeManager,
    pub registry: RegistryManager,
    #[builder(setter(into))]
    pub release_name: String,
    #[builder(setter(into))]
    pub artifacts_folder: PathBuf,
}

impl DeployParamsBuilder {
    pub fn build(self) -> Result<Deployer> {
        let params = self._build().map_err(|e| {
            ReleaseToolsError::InvalidConfig(format!(
                "Failed to build deployer: {}",
                e
            ))
        })?;
        Ok(Deployer::new(params))
    }
}

pub struct Deployer {
    forge: ForgeManager,
    registry: RegistryManager,
    release_name: String,
    artifacts_folder: PathBuf,
}

impl Deployer {
    pub fn builder() -> DeployParamsBuilder {
        DeployParamsBuilder::default()
    }

    pub fn new(params: DeployParams) -> Self {
        Self {
            forge: params.forge,
            registry: params.registry,
            release_name: params.release_name,
            artifacts_folder: params.artifacts_folder,
        }
    }

    pub async fn run(&self) -> Result<DeploySummary> {
        info!("Deploying {}", self.release_name);
        info!("Looking for GitHub release {}", self.release_name);

        let releases = self.forge.list_releases().await?;
        let release = chain::find_release(&releases, &self.release_name)?;

        let packages = artifacts::find_packages(&self.artifacts_folder).await?;
        if packages.is_empty() {
            return Err(ReleaseToolsError::not_found(
                "any artifacts to publish in",
                self.artifacts_folder.display().to_string(),
            ));
        }

        let mut summary = DeploySummary::default();

        info!("Uploading artifacts to GitHub release {}", release.name);
        for package in &packages {
            let name = self.upload_artifact(release, package).await?;
            summary.uploaded.push(name);
        }

        info!("Pushing packages to {}", self.registry.source());
        for package in &packages {
            self.registry.push(package).await?;
            summary.pushed.push(artifacts::file_name(package)?);
        }

        let issue_numbers = newly_referenced_issues(release, &releases);
        summary.commented =
            self.comment_on_issues(release, &issue_numbers).await?;

        info!("Finished deploying");

        Ok(summary)
    }

    async fn upload_artifact(
        &self,
        release: &Release,
        path: &Path,
    ) -> Result<String> {
        let file_name = artifacts::file_name(path)?;
        info!("Uploading {file_name}");

        let data = fs::read(path).await?;

        let asset = self
            .forge
            .upload_asset(UploadAssetRequest {
                release_id: release.id,
                file_name,
                data,
            })
            .await?;

        info!("Uploaded {}", asset.name);

        Ok(asset.name)
    }

    async fn comment_on_issues(
        &self,
        release: &Release,
        issue_numbers: &BTreeSet<u64>,
    ) -> Result<BTreeSet<u64>> {
        info!(
            "Adding 'released as part of' notes to {} issues",
            issue_numbers.len()
        );

        let body =
            released_comment(self.forge.remote_config(), &release.name)?;

        let requests = issue_numbers.iter().map(|number| {
            self.forge.create_comment(CreateCommentRequest {
                issue_number: *number,
                body: body.clone(),
            })
        });

        // every comment is attempted before the first failure is reported
        let results = join_all(requests).await;

        let mut first_error = None;
        for (number, result) in issue_numbers.iter().zip(results) {
            if let Err(err) = result {
                error!("Failed to comment on issue #{number}: {err}");
                first_error.get_or_insert(err);
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        Ok(issue_numbers.clone())
    }
}

/// Issues cited by `release` that none of its contributing pre-releases
/// already cited.
pub fn newly_referenced_issues(
    release: &Release,
    releases: &[Release],
) -> BTreeSet<u64> {
    let current = references::issue_numbers(&release.body);

    let pre_releases = chain::contributing_pre_releases(release, releases);
    let announced = references::issue_numbers_in(
        pre_releases.iter().map(|r| r.body.as_str()),
    );

    current.difference(&announced).copied().collect()
}

/// Comment posted on each issue shipped by a release.
pub fn released_comment(
    remote: &RemoteConfig,
    release_name: &str,
) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("repo", &remote.repo);
    context.insert("release", release_name);
    context.insert("link", &remote.release_link(release_name));

    Ok(tera::Tera::one_off(RELEASED_COMMENT_TEMPLATE, &context, false)?)
}
