use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::config::PackageConfig;
use crate::error::{RepublishError, Result};
use crate::manifest::{PackageManifest, MANIFEST_FILE};
use crate::package::Packager;
use crate::process::{git, git_raw};

/// Packages the files git tracks in the source repository.
///
/// The selection is every tracked path, narrowed to the manifest's `files`
/// allow-list when one is declared (the manifest itself always stays), minus
/// the configured exclusions. The manifest is read from the source at pack
/// time.
#[derive(Debug, Clone, Default)]
pub struct GitPackager {
    exclude: Vec<String>,
}

impl GitPackager {
    pub fn new(config: &PackageConfig) -> Self {
        GitPackager {
            exclude: config.exclude.clone(),
        }
    }

    /// File name of the archive [`Packager::pack_archive`] writes for
    /// `manifest`: `<name>-<version>.tgz`, with any npm scope flattened.
    pub fn archive_name(manifest: &PackageManifest) -> String {
        let name = manifest
            .package_name()
            .trim_start_matches('@')
            .replace('/', "-");
        format!("{}-{}.tgz", name, manifest.version.trim())
    }

    /// Paths, relative to `source`, that make up the package.
    pub async fn selection(&self, source: &Path, manifest: &PackageManifest) -> Result<Vec<String>> {
        let output = git_raw(["ls-files", "-z"], source).await?;
        Ok(output
            .split('\0')
            .filter(|path| !path.is_empty() && self.includes(manifest, path))
            .map(str::to_string)
            .collect())
    }

    fn includes(&self, manifest: &PackageManifest, path: &str) -> bool {
        if self.exclude.iter().any(|entry| covers(entry, path)) {
            return false;
        }
        if path == MANIFEST_FILE {
            return true;
        }
        match &manifest.files {
            Some(allow) => allow.iter().any(|entry| covers(entry, path)),
            None => true,
        }
    }
}

#[async_trait]
impl Packager for GitPackager {
    #[instrument(skip(self), fields(source = %source.display(), destination = %destination.display()))]
    async fn pack_into(&self, source: &Path, destination: &Path) -> Result<Vec<PathBuf>> {
        let manifest = PackageManifest::load(source)?;
        let selection = self.selection(source, &manifest).await?;

        let copies = selection.iter().map(|relative| async move {
            let from = source.join(relative);
            let to = destination.join(relative);
            if let Some(parent) = to.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(&from, &to).await?;
            Ok::<_, RepublishError>(PathBuf::from(relative))
        });

        let copied = try_join_all(copies).await?;
        debug!(files = copied.len(), "package contents copied");
        Ok(copied)
    }

    #[instrument(skip(self), fields(source = %source.display(), output_dir = %output_dir.display()))]
    async fn pack_archive(&self, source: &Path, output_dir: &Path) -> Result<PathBuf> {
        let manifest = PackageManifest::load(source)?;
        let selection = self.selection(source, &manifest).await?;
        if selection.is_empty() {
            return Err(RepublishError::manifest("package selects no tracked files"));
        }

        tokio::fs::create_dir_all(output_dir).await?;
        let output_dir = if output_dir.is_absolute() {
            output_dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(output_dir)
        };
        let archive = output_dir.join(Self::archive_name(&manifest));

        let mut args: Vec<OsString> = vec![
            "archive".into(),
            "--format=tar.gz".into(),
            "--prefix=package/".into(),
            "-o".into(),
            archive.clone().into_os_string(),
            "HEAD".into(),
            "--".into(),
        ];
        args.extend(selection.into_iter().map(OsString::from));

        git(args, source).await?;
        debug!(archive = %archive.display(), "package archive written");
        Ok(archive)
    }
}

/// Whether the allow/exclude `entry` names `path` itself or a directory
/// containing it.
fn covers(entry: &str, path: &str) -> bool {
    let entry = entry.trim_start_matches("./").trim_end_matches('/');
    if entry.is_empty() {
        return false;
    }
    path == entry
        || path
            .strip_prefix(entry)
            .map_or(false, |rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(files: Option<&[&str]>) -> PackageManifest {
        PackageManifest {
            name: Some("@acme/widget".to_string()),
            version: "1.2.3".to_string(),
            repository: None,
            files: files.map(|list| list.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn packager(exclude: &[&str]) -> GitPackager {
        GitPackager::new(&PackageConfig {
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_archive_name_flattens_scope() {
        assert_eq!(GitPackager::archive_name(&manifest(None)), "acme-widget-1.2.3.tgz");
    }

    #[test]
    fn test_covers() {
        assert!(covers("dist", "dist/index.js"));
        assert!(covers("./dist/", "dist/index.js"));
        assert!(covers("README.md", "README.md"));
        assert!(!covers("dist", "distribution/a.js"));
        assert!(!covers("", "anything"));
    }

    #[test]
    fn test_includes_everything_without_allow_list() {
        let packager = packager(&["republish.toml"]);
        let manifest = manifest(None);
        assert!(packager.includes(&manifest, "src/lib.js"));
        assert!(!packager.includes(&manifest, "republish.toml"));
    }

    #[test]
    fn test_allow_list_keeps_manifest() {
        let packager = packager(&[]);
        let manifest = manifest(Some(&["dist"]));
        assert!(packager.includes(&manifest, "dist/index.js"));
        assert!(packager.includes(&manifest, MANIFEST_FILE));
        assert!(!packager.includes(&manifest, "src/index.ts"));
    }

    #[test]
    fn test_exclude_wins_over_allow_list() {
        let packager = packager(&["dist/debug"]);
        let manifest = manifest(Some(&["dist"]));
        assert!(packager.includes(&manifest, "dist/index.js"));
        assert!(!packager.includes(&manifest, "dist/debug/trace.js"));
    }
}
