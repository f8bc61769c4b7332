pub mod orchestration;

pub use orchestration::{run_pack, run_publish_workflow, PublishWorkflowArgs};
