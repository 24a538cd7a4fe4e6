// Order processing pipeline: validation, transformation, analysis and orchestration

pub mod orchestrator;
pub mod processing;
pub mod utils;

// Re-export key types from each stage
pub use orchestrator::{
    process_batch, OrderPipeline, PipelineOptions, PipelineReport, ProcessedBatch, RunStatus,
};
pub use processing::{Notice, NoticeKind, Rejection, RejectionReason, Stage, StageOutcome};
