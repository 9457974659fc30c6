//! Command-line workflow, kept free of clap so it can be driven from tests.

pub mod orchestration;

pub use orchestration::{
    run_bump_workflow, BumpPlan, BumpWorkflowArgs, Bumper, SegmentSelection, WorkflowResult,
};
