use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::config::RefNameCheck;
use crate::error::{RepublishError, Result};
use crate::git::BranchName;
use crate::process::{git, git_raw, output_lines};

/// Name of the metadata directory that marks a working copy.
pub const GIT_DIR: &str = ".git";

/// Handle to a local working copy.
///
/// Every operation shells out to `git` inside [`Repository::path`]. Process
/// failures surface unchanged as [`RepublishError::Process`]; deciding whether
/// they are fatal is left to the caller. A working copy is assumed to have a
/// single writer for as long as a handle to it is in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    path: PathBuf,
    remote_url: Option<String>,
    ref_names: RefNameCheck,
}

impl Repository {
    /// Open the working copy rooted at `dir`.
    ///
    /// Fails with [`RepublishError::NotARepository`] unless `dir` exists and
    /// contains a `.git` entry.
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let path = dir
            .canonicalize()
            .map_err(|_| RepublishError::NotARepository(dir.to_path_buf()))?;

        if !path.join(GIT_DIR).exists() {
            return Err(RepublishError::NotARepository(path));
        }

        Ok(Repository {
            path,
            remote_url: None,
            ref_names: RefNameCheck::default(),
        })
    }

    /// Clone `url` into `parent/<project name>` and open the result.
    #[instrument(fields(parent = %parent.display()))]
    pub async fn clone(url: &str, parent: &Path) -> Result<Self> {
        let destination = Self::clone_destination(url, parent)?;
        let project = project_name(url).unwrap_or_default();

        tokio::fs::create_dir_all(parent).await?;
        git(["clone", url, project.as_str()], parent).await?;
        debug!(destination = %destination.display(), "clone complete");

        let mut repo = Self::from_directory(&destination)?;
        repo.remote_url = Some(url.to_string());
        Ok(repo)
    }

    /// Where [`Repository::clone`] puts a clone of `url` under `parent`.
    pub fn clone_destination(url: &str, parent: &Path) -> Result<PathBuf> {
        project_name(url)
            .map(|name| parent.join(name))
            .ok_or_else(|| {
                RepublishError::manifest(format!("cannot infer a project name from '{}'", url))
            })
    }

    /// Select how branch names created against this repository are checked.
    pub fn with_ref_name_check(mut self, check: RefNameCheck) -> Self {
        self.ref_names = check;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The url this working copy was cloned from, when known.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    pub fn ref_name_check(&self) -> RefNameCheck {
        self.ref_names
    }

    /// Tracked paths with staged or unstaged changes.
    pub async fn modified_files(&self) -> Result<Vec<String>> {
        let output = git_raw(
            ["status", "--porcelain", "-z", "--untracked-files=no"],
            &self.path,
        )
        .await?;

        Ok(status_paths(&output))
    }

    /// Paths neither tracked nor ignored.
    pub async fn untracked_files(&self) -> Result<Vec<String>> {
        let output = git_raw(
            ["ls-files", "--others", "--exclude-standard", "-z"],
            &self.path,
        )
        .await?;

        Ok(split_nul(&output))
    }

    pub async fn tags(&self) -> Result<Vec<String>> {
        let output = git(["tag", "--list"], &self.path).await?;
        Ok(output_lines(&output))
    }

    /// Tags published at `remote` (a remote name or url), read with
    /// `git ls-remote` without fetching anything.
    pub async fn remote_tags(&self, remote: &str) -> Result<Vec<String>> {
        let output = git(["ls-remote", "--tags", remote], &self.path).await?;
        Ok(parse_remote_tags(&output))
    }

    /// The revision HEAD points at.
    pub async fn current_commit_hash(&self) -> Result<String> {
        Ok(git(["rev-parse", "HEAD"], &self.path).await?)
    }

    /// Detach HEAD at `revision`.
    pub async fn checkout_commit(&self, revision: &str) -> Result<()> {
        git(["checkout", revision], &self.path).await?;
        Ok(())
    }

    /// Switch to `branch`, creating it at HEAD (or from its remote-tracking
    /// counterpart) when `create_if_missing` is set and no local branch of
    /// that name exists.
    pub async fn checkout_branch(&self, branch: &BranchName, create_if_missing: bool) -> Result<()> {
        let exists = BranchName::enumerate(self)
            .await?
            .iter()
            .any(|known| !known.is_remote() && known.name() == branch.name());

        if exists || !create_if_missing {
            git(["checkout", branch.name()], &self.path).await?;
            return Ok(());
        }

        match branch.remote() {
            Some(_) => {
                let start = branch.full_name();
                git(["checkout", "-b", branch.name(), start.as_str()], &self.path).await?;
            }
            None => {
                git(["checkout", "-b", branch.name()], &self.path).await?;
            }
        }
        Ok(())
    }

    /// Stage every change in the working tree, deletions included.
    pub async fn stage_all(&self) -> Result<()> {
        git(["add", "--all"], &self.path).await?;
        Ok(())
    }

    /// Commit the index. Fails when nothing is staged.
    pub async fn commit(&self, message: &str) -> Result<()> {
        git(["commit", "-m", message], &self.path).await?;
        Ok(())
    }

    /// Tag HEAD. Lightweight tags ignore `message`; annotated tags fall back
    /// to the tag name when no message is given. Fails if the tag exists.
    pub async fn create_tag(&self, name: &str, message: Option<&str>, annotated: bool) -> Result<()> {
        let args: Vec<&str> = if annotated {
            vec!["tag", "-a", name, "-m", message.unwrap_or(name)]
        } else {
            vec!["tag", name]
        };
        git(args, &self.path).await?;
        Ok(())
    }

    pub async fn push_tag(&self, name: &str, remote: &str, force: bool) -> Result<()> {
        let refspec = format!("refs/tags/{}", name);
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.push(remote);
        args.push(refspec.as_str());

        git(args, &self.path).await?;
        Ok(())
    }

    /// Absolute paths of every tracked file.
    pub async fn files(&self) -> Result<Vec<PathBuf>> {
        let output = git_raw(["ls-files", "-z"], &self.path).await?;
        Ok(split_nul(&output)
            .into_iter()
            .map(|relative| self.path.join(relative))
            .collect())
    }

    /// Remove directories left empty under the working tree, bottom-up.
    /// The `.git` directory is never touched. Returns how many were removed.
    pub async fn prune(&self) -> Result<usize> {
        let root = self.path.clone();
        let removed = tokio::task::spawn_blocking(move || prune_empty_dirs(&root))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        debug!(removed, "pruned empty directories");
        Ok(removed)
    }
}

/// The project name git would pick for a clone of `url`: the last path
/// segment with any `.git` suffix removed.
pub fn project_name(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(|c| c == '/' || c == ':').next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// Paths from `git status --porcelain -z`. Each record is `XY <path>`;
/// renames and copies are followed by a second record naming the origin,
/// which is skipped.
fn status_paths(output: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut records = output.split('\0');
    while let Some(record) = records.next() {
        let (Some(status), Some(path)) = (record.get(..2), record.get(3..)) else {
            continue;
        };
        if status.contains('R') || status.contains('C') {
            records.next();
        }
        if !path.is_empty() {
            paths.push(path.to_string());
        }
    }
    paths
}

fn parse_remote_tags(output: &str) -> Vec<String> {
    output_lines(output)
        .iter()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|reference| reference.strip_prefix("refs/tags/"))
        .filter(|tag| !tag.ends_with("^{}"))
        .map(str::to_string)
        .collect()
}

fn split_nul(output: &str) -> Vec<String> {
    output
        .split('\0')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn prune_empty_dirs(dir: &Path) -> io::Result<usize> {
    let mut removed = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || entry.file_name() == GIT_DIR {
            continue;
        }

        let child = entry.path();
        removed += prune_empty_dirs(&child)?;
        if std::fs::read_dir(&child)?.next().is_none() {
            std::fs::remove_dir(&child)?;
            removed += 1;
        }
    }

    Ok(removed)
}
