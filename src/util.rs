//! Small shared helpers that do not belong to a single subsystem.

pub mod config;
