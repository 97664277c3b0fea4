#![forbid(unsafe_code)]

//! Read-only boundary to the external source stores.
//!
//! The engine never writes activity records; each trait here mirrors one
//! already-authenticated query surface owned by an external system, plus
//! an in-memory implementation for tests and prototyping.

pub mod sources;

pub use sources::{
    DiarySource, FlashcardSource, InMemorySources, OjtLogSource, QuizResultSource, SourceError,
    Sources, VideoWatchSource,
};
