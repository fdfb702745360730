//! stringfrag-core: Core types for quark-string hadronization post-processing.
//!
//! This crate provides the flat particle record produced by an external
//! event-generation engine, PDG numbering helpers, the seed-string
//! configuration and the trait boundary to the engine itself.
//!

pub mod error;
pub mod event;
pub mod generator;
pub mod particle;
pub mod pdg;
pub mod seed;

pub use error::{Error, GenerationError, Result};
pub use event::Event;
pub use generator::{EventGenerator, RecordedEvents};
pub use particle::{FourVector, MotherPair, ParticleRecord};
pub use seed::SeedString;
