//! Package metadata read from `package.json`.
//!
//! Only the fields the publish workflow consumes are modelled: the package
//! name and version, the repository it lives in, and the optional `files`
//! allow-list the packager honours.

use std::path::Path;

use serde::Deserialize;

use crate::error::{RepublishError, Result, ValidationError};

/// Manifest file name, relative to the package root.
pub const MANIFEST_FILE: &str = "package.json";

/// Hosts reachable through `<host>:owner/repo` shorthands.
const SHORTHAND_HOSTS: &[(&str, &str)] = &[
    ("github", "github.com"),
    ("gitlab", "gitlab.com"),
    ("bitbucket", "bitbucket.org"),
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RepositoryField {
    Url(String),
    Detailed {
        url: String,
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}

impl RepositoryField {
    pub fn url(&self) -> &str {
        match self {
            RepositoryField::Url(url) => url,
            RepositoryField::Detailed { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub repository: Option<RepositoryField>,

    #[serde(default)]
    pub files: Option<Vec<String>>,
}

impl PackageManifest {
    /// Read `package.json` from the package root `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            RepublishError::manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| RepublishError::manifest(e.to_string()))
    }

    /// The declared version, rejecting a missing or blank one.
    pub fn version(&self) -> std::result::Result<&str, ValidationError> {
        let version = self.version.trim();
        if version.is_empty() {
            Err(ValidationError::MissingVersion)
        } else {
            Ok(version)
        }
    }

    /// Package name used for archive file names, `package` when absent.
    pub fn package_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("package")
    }

    /// The normalised repository url.
    pub fn repository_url(&self) -> std::result::Result<String, ValidationError> {
        self.repository
            .as_ref()
            .and_then(|repo| normalize_repository_url(repo.url()))
            .ok_or(ValidationError::MissingRepositoryUrl)
    }
}

/// Turn a manifest repository value into a url git can clone.
///
/// Strips a `git+` prefix and expands `github:`, `gitlab:` and `bitbucket:`
/// shorthands as well as bare `owner/repo` (GitHub). Returns `None` for a
/// blank value.
pub fn normalize_repository_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let url = raw.strip_prefix("git+").unwrap_or(raw);

    for (prefix, host) in SHORTHAND_HOSTS {
        if let Some(path) = url.strip_prefix(prefix).and_then(|rest| rest.strip_prefix(':')) {
            return Some(hosted_url(host, path));
        }
    }

    if is_owner_repo_shorthand(url) {
        return Some(hosted_url("github.com", url));
    }

    Some(url.to_string())
}

/// Anchor a `./` or `../` repository path at the package root `root`, so a
/// clone run from the work directory still finds it. Other urls are returned
/// unchanged.
pub fn resolve_repository_url(url: &str, root: &Path) -> String {
    if url.starts_with("./") || url.starts_with("../") {
        root.join(url).to_string_lossy().into_owned()
    } else {
        url.to_string()
    }
}

/// Reference a downstream consumer can install the package from.
pub fn install_reference(url: &str, tag: &str) -> String {
    if url.starts_with("git://") {
        format!("{}#{}", url, tag)
    } else {
        format!("git+{}#{}", url, tag)
    }
}

fn hosted_url(host: &str, path: &str) -> String {
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    format!("https://{}/{}.git", host, path)
}

fn is_owner_repo_shorthand(url: &str) -> bool {
    let mut parts = url.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) => {
            let plain = |s: &str| {
                !s.is_empty()
                    && s
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            };
            plain(owner) && plain(repo) && owner != "." && owner != ".."
        }
        _ => false,
    }
}
