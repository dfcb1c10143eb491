//! finforge-core: synthetic relational finance data, reconciled into
//! a SQLite store under replace / insert / merge loading semantics.
//!
//! The library is invoked in-process by a scheduling collaborator
//! (see the `datagen` tool); there is no wire protocol. One
//! `LoadEngine::run` call is one atomic unit of work.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod names;
pub mod plan;
pub mod rng;
pub mod shape;
pub mod store;
pub mod synth;
pub mod types;

pub use config::GenConfig;
pub use engine::{LoadEngine, RunReport};
pub use error::{LoadError, LoadResult};
pub use plan::LoadMode;
pub use shape::{ShapeCounts, TargetShape};
pub use store::DataStore;
pub use synth::{FieldSynthesizer, Synthesize};
