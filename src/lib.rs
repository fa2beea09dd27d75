//! Turn uploaded CSV or PDF financial statements into one typed dataset, then
//! derive chart specifications and priority-based recommendations from it.
//!
//! Rendering, authentication and durable activity storage live outside this
//! crate; it hands back declarative results and [`activity`] events.

pub mod activity;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod recommend;

pub use chart::{ChartKind, ChartRequest, ChartSpec};
pub use config::PipelineConfig;
pub use data::document::Document;
pub use data::model::Dataset;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, SessionContext};
pub use recommend::{PriorityCategory, RecommendationSet};
