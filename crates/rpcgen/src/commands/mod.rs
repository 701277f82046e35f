//! CLI command implementations - one module per top-level command.

pub mod generate;
