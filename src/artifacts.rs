//! Discovery of build artifacts on the local filesystem.
use log::*;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{ReleaseToolsError, Result};

/// Extension of the package files published by deploy.
pub const PACKAGE_EXTENSION: &str = "nupkg";

/// Package files directly inside `folder`, sorted by path.
pub async fn find_packages(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(folder).await.map_err(|err| {
        ReleaseToolsError::invalid_args(format!(
            "unable to read artifacts folder {}: {err}",
            folder.display()
        ))
    })?;

    let mut packages = vec![];

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if !entry.file_type().await?.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PACKAGE_EXTENSION));

        if matches {
            debug!("found package artifact: {}", path.display());
            packages.push(path);
        }
    }

    packages.sort();

    Ok(packages)
}

/// File name component used when publishing an artifact.
pub fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            ReleaseToolsError::invalid_args(format!(
                "artifact path has no file name: {}",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn finds_only_package_files() {
        let dir = TempDir::new().unwrap();
        std_fs::write(dir.path().join("Widgets.2.1.0.nupkg"), b"pkg").unwrap();
        std_fs::write(dir.path().join("Widgets.2.1.0.snupkg"), b"sym").unwrap();
        std_fs::write(dir.path().join("Gadgets.2.1.0.NUPKG"), b"pkg").unwrap();
        std_fs::write(dir.path().join("notes.txt"), b"txt").unwrap();
        std_fs::create_dir(dir.path().join("nested.nupkg")).unwrap();

        let packages = find_packages(dir.path()).await.unwrap();
        let names = packages
            .iter()
            .map(|p| file_name(p).unwrap())
            .collect::<Vec<String>>();

        assert_eq!(names, vec!["Gadgets.2.1.0.NUPKG", "Widgets.2.1.0.nupkg"]);
    }

    #[tokio::test]
    async fn empty_folder_has_no_packages() {
        let dir = TempDir::new().unwrap();

        assert!(find_packages(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        assert!(matches!(
            find_packages(&missing).await,
            Err(ReleaseToolsError::InvalidArgs(_))
        ));
    }
}
