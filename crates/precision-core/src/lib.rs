//! Core types and definitions for the precision guidance engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! vectors, state snapshots, enums, constants, configuration bundles,
//! the gravity field, the atmosphere, and the payload accuracy catalog.
//! It performs no I/O and has no dependency on any runtime framework.

pub mod accuracy;
pub mod atmosphere;
pub mod config;
pub mod constants;
pub mod enums;
pub mod gravity;
pub mod types;
