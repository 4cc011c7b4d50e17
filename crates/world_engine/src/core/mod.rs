//! Core module - configuration and simulation context
//!
//! Everything a host application needs to stand the world up: the serialized
//! configuration types and the context object that owns the live subsystems.

pub mod config;
pub mod context;
