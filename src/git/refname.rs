//! Reference-name grammar, checked without spawning git.
//!
//! Mirrors `git check-ref-format --allow-onelevel`: a name is split on `/`
//! into components and each component, plus the name as a whole, must avoid
//! the constructs git reserves.

/// Characters git never allows anywhere in a reference name.
const FORBIDDEN_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Returns `true` when `name` is a valid one-level-or-deeper reference name.
pub fn is_valid_ref_name(name: &str) -> bool {
    if name.is_empty() || name == "@" {
        return false;
    }
    if name.ends_with('/') || name.ends_with('.') {
        return false;
    }
    if name.contains("..") || name.contains("@{") {
        return false;
    }
    if name
        .chars()
        .any(|c| c.is_ascii_control() || FORBIDDEN_CHARS.contains(&c))
    {
        return false;
    }

    name.split('/').all(is_valid_component)
}

fn is_valid_component(component: &str) -> bool {
    !component.is_empty() && !component.starts_with('.') && !component.ends_with(".lock")
}
