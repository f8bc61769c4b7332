//! Real-git fixtures shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use git_republish::config::Config;
use tempfile::TempDir;

pub fn check_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Isolate git from the host configuration and give commits an identity.
/// Mutates the process environment, so callers must be `#[serial]`.
pub fn isolate_git(home: &Path) {
    std::env::set_var("HOME", home);
    std::env::set_var("GIT_CONFIG_NOSYSTEM", "1");
    std::env::set_var("GIT_TERMINAL_PROMPT", "0");
    std::env::set_var("GIT_AUTHOR_NAME", "Test User");
    std::env::set_var("GIT_AUTHOR_EMAIL", "test@example.com");
    std::env::set_var("GIT_COMMITTER_NAME", "Test User");
    std::env::set_var("GIT_COMMITTER_EMAIL", "test@example.com");
}

/// Run git in `dir`, panicking with its stderr on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A package checked out from a bare "published" repository.
///
/// The manifest's `files` list leaves `test/` out, so the published tree
/// always differs from the source tree.
///
/// Layout under one temp dir: `home/`, `remote.git` (bare, the manifest's
/// repository url), `source/` (clean working tree with `main` pushed) and
/// `work/` (where the workflow clones).
pub struct PackageFixture {
    root: TempDir,
}

impl PackageFixture {
    pub fn new() -> Self {
        Self::with_manifest(|manifest| manifest)
    }

    /// Build the fixture, letting `edit` adjust the default manifest.
    pub fn with_manifest(edit: impl FnOnce(serde_json::Value) -> serde_json::Value) -> Self {
        let root = TempDir::new().expect("temp dir");
        let fixture = PackageFixture { root };
        fs::create_dir_all(fixture.home()).unwrap();
        isolate_git(&fixture.home());

        fs::create_dir_all(fixture.remote()).unwrap();
        git(&fixture.remote(), &["init", "--bare", "-b", "main"]);

        let source = fixture.source();
        fs::create_dir_all(source.join("lib")).unwrap();
        fs::create_dir_all(source.join("test")).unwrap();
        git(&source, &["init", "-b", "main"]);

        let manifest = edit(serde_json::json!({
            "name": "widget",
            "version": "1.2.3",
            "repository": {
                "type": "git",
                "url": fixture.remote().to_string_lossy(),
            },
            "files": ["index.js", "lib"],
        }));
        fs::write(
            source.join("package.json"),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        fs::write(source.join("index.js"), "module.exports = require('./lib/util');\n").unwrap();
        fs::write(source.join("lib/util.js"), "module.exports = 42;\n").unwrap();
        fs::write(source.join("test/util.test.js"), "assert(require('../lib/util') === 42);\n").unwrap();

        git(&source, &["add", "--all"]);
        git(&source, &["commit", "-m", "Initial commit"]);
        git(&source, &["remote", "add", "origin", &fixture.remote().to_string_lossy()]);
        git(&source, &["push", "origin", "main"]);

        fixture
    }

    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn remote(&self) -> PathBuf {
        self.root.path().join("remote.git")
    }

    pub fn source(&self) -> PathBuf {
        self.root.path().join("source")
    }

    pub fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    /// Where the workflow clones the remote.
    pub fn clone_dir(&self) -> PathBuf {
        self.work().join("remote")
    }

    /// Defaults, with clones kept under [`PackageFixture::work`].
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.publish.work_dir = Some(self.work());
        config
    }

    /// Tag names the bare remote holds.
    pub fn remote_tags(&self) -> Vec<String> {
        let listing = git(self.root.path(), &["ls-remote", "--tags", &self.remote().to_string_lossy()]);
        listing
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .filter_map(|reference| reference.strip_prefix("refs/tags/"))
            .filter(|tag| !tag.ends_with("^{}"))
            .map(str::to_string)
            .collect()
    }

    /// Commit a new file in the source and push it.
    pub fn commit_source_file(&self, relative: &str, contents: &str) {
        let source = self.source();
        let path = source.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
        git(&source, &["add", "--all"]);
        git(&source, &["commit", "-m", &format!("Add {}", relative)]);
        git(&source, &["push", "origin", "main"]);
    }
}
