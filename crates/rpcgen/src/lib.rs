//! Command-line front end for rpcgen.
//!
//! Reads `rpcgen.yml` from the working directory, loads every definition
//! under the configured folder and writes one Go file with models, service
//! interfaces and Fiber wiring.

use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser, Debug)]
#[command(name = "rpcgen", version, about = "Generate Go RPC types and Fiber wiring from YAML")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate code from the definitions named in rpcgen.yml
    Generate(commands::generate::GenerateArgs),
}

impl Cli {
    /// Dispatch to the selected command, returning the process exit code.
    pub fn run(self) -> i32 {
        match self.command {
            Command::Generate(args) => commands::generate::run(args),
        }
    }
}
