//! Encoder command assembly.
//!
//! Nodes describe their inputs through [`command::CommandBuilder`]; running the encoder is left to
//! the caller.

/// Command builder trait and built-in builders.
pub mod command;
