use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::RefNameCheck;
use crate::error::{ProcessError, RepublishError, Result};
use crate::git::{refname, Repository};
use crate::predicate::PredicateAggregator;
use crate::process::{git, output_lines};

/// A branch identity: a name plus, for remote-tracking branches, the remote
/// it belongs to. `name` never carries the `remotes/<remote>/` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName {
    name: String,
    remote: Option<String>,
}

impl BranchName {
    /// Build a branch name after checking it against the repository's
    /// configured reference-name rules.
    ///
    /// Fails with [`RepublishError::InvalidBranchName`] when any check
    /// rejects the name or cannot be evaluated.
    pub async fn create(
        repo: &Repository,
        name: impl Into<String>,
        remote: Option<&str>,
    ) -> Result<Self> {
        let name = name.into();

        if !branch_name_checks(repo.path(), repo.ref_name_check())
            .is_valid(&name)
            .await
        {
            return Err(RepublishError::InvalidBranchName(name));
        }

        Ok(BranchName {
            name,
            remote: remote.map(str::to_string),
        })
    }

    /// Every local and remote-tracking branch of `repo`, as listed by
    /// `git branch -a`. Names come from git itself and are not re-validated.
    pub async fn enumerate(repo: &Repository) -> Result<Vec<Self>> {
        let output = git(["branch", "-a"], repo.path()).await?;
        parse_branch_listing(&output)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// `<remote>/<name>` for remote-tracking branches, `<name>` otherwise.
    pub fn full_name(&self) -> String {
        match &self.remote {
            Some(remote) => format!("{}/{}", remote, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Ask `git check-ref-format` whether `name` is a valid reference name.
///
/// Exit status 1 is git's verdict "invalid" and maps to `Ok(false)`; any
/// other failure means the check itself could not run.
pub async fn check_ref_format(name: &str, cwd: &Path) -> std::result::Result<bool, ProcessError> {
    match git(["check-ref-format", "--allow-onelevel", name], cwd).await {
        Ok(_) => Ok(true),
        Err(e) if e.exit_code == 1 => Ok(false),
        Err(e) => Err(e),
    }
}

/// `true` iff git accepts `name` as a reference name. Never fails: a check
/// that cannot run answers `false`.
pub async fn is_valid_branch_name(name: &str, cwd: &Path) -> bool {
    check_ref_format(name, cwd).await.unwrap_or(false)
}

fn branch_name_checks(cwd: &Path, strategy: RefNameCheck) -> PredicateAggregator<String> {
    // a leading dash would be read as an option by `git checkout -b`
    let checks = PredicateAggregator::new().with_check(|name: &String| !name.starts_with('-'));

    match strategy {
        RefNameCheck::Git => {
            // same verdict as `is_valid_branch_name`, but a check that cannot
            // run reaches the aggregator as an error and is logged there
            let cwd: PathBuf = cwd.to_path_buf();
            checks.with_async_check(move |name: String| {
                let cwd = cwd.clone();
                async move { check_ref_format(&name, &cwd).await.map_err(anyhow::Error::from) }
            })
        }
        RefNameCheck::Native => {
            checks.with_check(|name: &String| refname::is_valid_ref_name(name))
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum BranchLine {
    /// Symbolic refs and detached-HEAD markers
    Noise,
    Branch(BranchName),
}

fn branch_line_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:remotes/(?P<remote>[^/\s]+)/)?(?P<name>\S+)$")
            .expect("branch line pattern is valid")
    })
}

fn classify_line(raw: &str) -> Result<BranchLine> {
    let line = raw.trim();
    let line = line
        .strip_prefix('*')
        .or_else(|| line.strip_prefix('+'))
        .map(str::trim_start)
        .unwrap_or(line);

    if line.contains(" -> ") {
        return Ok(BranchLine::Noise);
    }
    if line.starts_with('(') && line.ends_with(')') {
        return Ok(BranchLine::Noise);
    }

    let captures = branch_line_regex()
        .captures(line)
        .ok_or_else(|| RepublishError::parse(format!("unrecognised branch line '{}'", raw)))?;

    Ok(BranchLine::Branch(BranchName {
        name: captures["name"].to_string(),
        remote: captures.name("remote").map(|m| m.as_str().to_string()),
    }))
}

/// Parse the output of `git branch -a`.
pub fn parse_branch_listing(output: &str) -> Result<Vec<BranchName>> {
    let mut branches = Vec::new();
    for line in output_lines(output) {
        if let BranchLine::Branch(branch) = classify_line(&line)? {
            branches.push(branch);
        }
    }
    Ok(branches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(name: &str) -> BranchName {
        BranchName {
            name: name.to_string(),
            remote: None,
        }
    }

    fn remote(remote: &str, name: &str) -> BranchName {
        BranchName {
            name: name.to_string(),
            remote: Some(remote.to_string()),
        }
    }

    #[test]
    fn test_current_branch_marker_stripped() {
        assert_eq!(parse_branch_listing("* main").unwrap(), vec![local("main")]);
    }

    #[test]
    fn test_symbolic_head_line_is_noise() {
        assert_eq!(
            classify_line("  remotes/origin/HEAD -> origin/master").unwrap(),
            BranchLine::Noise
        );
    }

    #[test]
    fn test_detached_head_line_is_noise() {
        assert_eq!(
            classify_line("* (HEAD detached at 1a2b3c4)").unwrap(),
            BranchLine::Noise
        );
        assert_eq!(classify_line("* (no branch)").unwrap(), BranchLine::Noise);
    }

    #[test]
    fn test_remote_prefix_split() {
        assert_eq!(
            classify_line("  remotes/origin/feature/login").unwrap(),
            BranchLine::Branch(remote("origin", "feature/login"))
        );
    }

    #[test]
    fn test_local_branch_with_slash() {
        assert_eq!(
            classify_line("  feature/login").unwrap(),
            BranchLine::Branch(local("feature/login"))
        );
    }

    #[test]
    fn test_worktree_marker_stripped() {
        assert_eq!(
            classify_line("+ other-worktree").unwrap(),
            BranchLine::Branch(local("other-worktree"))
        );
    }

    #[test]
    fn test_full_listing() {
        let output = "\
* main
  develop
  remotes/origin/HEAD -> origin/main
  remotes/origin/main
  remotes/upstream/release/1.x
";
        let branches = parse_branch_listing(output).unwrap();
        assert_eq!(
            branches,
            vec![
                local("main"),
                local("develop"),
                remote("origin", "main"),
                remote("upstream", "release/1.x"),
            ]
        );
        assert!(branches.iter().all(|b| b.name() != "HEAD"));
    }

    #[test]
    fn test_unparseable_line_is_error() {
        let err = parse_branch_listing("  what is this").unwrap_err();
        assert!(matches!(err, RepublishError::Parse(_)));
    }

    #[test]
    fn test_full_name_and_display() {
        assert_eq!(remote("origin", "main").full_name(), "origin/main");
        assert_eq!(local("main").to_string(), "main");
        assert!(remote("origin", "main").is_remote());
        assert!(!local("main").is_remote());
    }

    #[tokio::test]
    async fn test_native_checks() {
        let cwd = std::env::temp_dir();
        let checks = branch_name_checks(&cwd, RefNameCheck::Native);

        assert!(checks.is_valid(&"republish-alice-1700000000".to_string()).await);
        assert!(!checks.is_valid(&"bad..name".to_string()).await);
        assert!(!checks.is_valid(&"-looks-like-a-flag".to_string()).await);
    }
}
