#![forbid(unsafe_code)]

//! Progress aggregation and recommendation engine for trade apprentices.
//!
//! Everything in here is a pure, recomputed projection over an immutable
//! snapshot of learner-activity events: normalize raw source records once
//! at the boundary, then derive streaks, factor scores, the overall
//! progress blend, recommendations, and a single insight sentence.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod error;
pub mod insight;
pub mod model;
pub mod normalize;
pub mod recommend;
pub mod score;
pub mod time;

pub use config::{ConfigError, EngineConfig, FactorWeights};
pub use error::Error;
pub use time::Clock;
