//! Stage orchestration.
//!
//! - [`resources`]: read-only resources loaded once at start-up
//! - [`stage`]: stage names, records and the timing wrapper
//! - [`orchestrator`]: the [`Pipeline`] that runs the stages in order

pub mod orchestrator;
pub mod resources;
pub mod stage;

pub use orchestrator::{Pipeline, PipelineRequest};
pub use resources::Resources;
pub use stage::{Stage, StageResult, StageValue};
