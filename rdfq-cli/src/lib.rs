//! rdfq CLI library.
//!
//! Command handlers behind the `rdfq` binary: compile template event
//! streams, prepare parameterized queries, and read back variable origins.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;

use cli::{Cli, Commands};

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile {
            file,
            shape,
            no_union,
            base,
        } => {
            let compiler = config.compiler(shape.map(Into::into), no_union);
            commands::compile::run(file.as_deref(), &config, compiler, base.as_deref())
        }

        Commands::Prepare {
            file,
            system_id,
            params,
        } => commands::prepare::run(file.as_deref(), &config, system_id.as_deref(), &params),

        Commands::Origins { file } => commands::origins::run(file.as_deref()),
    }
}
