use std::path::PathBuf;

use git_republish::boundary::BoundaryWarning;
use git_republish::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_stale_clone_warning_display() {
    let warning = BoundaryWarning::StaleCloneRemoved {
        path: PathBuf::from("/tmp/git-republish/widget"),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("stale clone"),
        "Message should mention the stale clone, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("/tmp/git-republish/widget"),
        "Message should contain the path, got: {}",
        display_msg
    );
}

#[test]
fn test_empty_package_warning_display() {
    let warning = BoundaryWarning::EmptyPackage {
        source: PathBuf::from("/work/widget"),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("no files"),
        "Message should say nothing was packaged, got: {}",
        display_msg
    );
    assert!(display_msg.contains("/work/widget"));
}

// ============================================================================
// UI Display Tests
// ============================================================================

#[test]
fn test_display_boundary_warning_does_not_panic() {
    let warnings = vec![
        BoundaryWarning::StaleCloneRemoved {
            path: PathBuf::from("/tmp/a"),
        },
        BoundaryWarning::EmptyPackage {
            source: PathBuf::from("/tmp/b"),
        },
    ];

    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
}
