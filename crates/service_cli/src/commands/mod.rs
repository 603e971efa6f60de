//! CLI command implementations
//!
//! Each submodule implements one `lcis` subcommand. Commands build their
//! output as a string through a `render` function and `run` prints it, so
//! the output can be tested without capturing stdout.

pub mod check;
pub mod demo;
pub mod evaluate;
pub mod list;
pub mod optimise_blend;
pub mod run;
