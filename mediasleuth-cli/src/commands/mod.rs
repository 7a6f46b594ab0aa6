//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `inspect` command.
pub mod inspect;

/// Module containing the implementation of the `purge` command.
pub mod purge;
