//! Command line interface for the Aegis pipeline.

pub mod args;
pub mod commands;
pub mod output;
