use chrono::{DateTime, Utc};

/// Name of the throwaway branch a publish commits on:
/// `<prefix>-<user>-<unix seconds>`.
pub fn temp_branch_name(prefix: &str, user: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}-{}", prefix, user, at.timestamp())
}

/// The invoking user's login name, `unknown` when the environment has none.
/// Characters outside `[A-Za-z0-9_-]` become `-` so the result is always
/// usable inside a branch name.
pub fn current_user() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|user| branch_safe(user.trim()))
        .find(|user| !user.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn branch_safe(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    cleaned.trim_matches('-').to_string()
}
