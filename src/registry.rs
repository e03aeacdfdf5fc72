//! Package registry publishing.
use async_trait::async_trait;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tokio::process::Command;
use url::Url;

use crate::{ReleaseToolsError, Result, artifacts};

/// NuGet executable used when no tool path is configured.
pub const DEFAULT_NUGET_TOOL: &str = "nuget";

#[cfg(test)]
use mockall::automock;

/// Capability to push a local package file to a registry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    fn source(&self) -> String;
    async fn push(&self, package: &Path) -> Result<()>;
}

/// Pushes packages with the NuGet command line client.
pub struct NugetRegistry {
    tool: String,
    source: Url,
    api_key: SecretString,
}

impl NugetRegistry {
    pub fn new(
        tool: &str,
        source: &str,
        api_key: SecretString,
    ) -> Result<Self> {
        let source = Url::parse(source)?;

        Ok(Self {
            tool: tool.to_string(),
            source,
            api_key,
        })
    }
}

#[async_trait]
impl Registry for NugetRegistry {
    fn source(&self) -> String {
        self.source.to_string()
    }

    async fn push(&self, package: &Path) -> Result<()> {
        let output = Command::new(&self.tool)
            .arg("push")
            .arg(package)
            .arg("-ApiKey")
            .arg(self.api_key.expose_secret())
            .arg("-Source")
            .arg(self.source.as_str())
            .arg("-NonInteractive")
            .arg("-ForceEnglishOutput")
            .output()
            .await
            .map_err(|err| {
                ReleaseToolsError::registry(format!(
                    "failed to run {}: {err}",
                    self.tool
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ReleaseToolsError::registry(format!(
                "{} push {} exited with {}: {}{}",
                self.tool,
                package.display(),
                output.status,
                stdout.trim(),
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Dry-run aware wrapper around a registry implementation.
pub struct RegistryManager {
    registry: Box<dyn Registry>,
    dry_run: bool,
}

impl RegistryManager {
    pub fn new(registry: Box<dyn Registry>, dry_run: bool) -> Self {
        Self { registry, dry_run }
    }

    pub fn source(&self) -> String {
        self.registry.source()
    }

    pub async fn push(&self, package: &Path) -> Result<()> {
        let name = artifacts::file_name(package)?;

        if self.dry_run {
            warn!("dry_run: would push {name} to {}", self.registry.source());
            return Ok(());
        }

        info!("Pushing {name}");
        self.registry.push(package).await?;
        info!("Pushed {name}");

        Ok(())
    }
}
