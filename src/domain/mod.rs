//! Domain logic - pure naming rules independent of git operations

pub mod branch;
pub mod tag;

pub use branch::{current_user, temp_branch_name};
pub use tag::{resolve_tags, tag_collisions, TagPattern};
