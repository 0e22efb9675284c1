use clap::{Parser, Subcommand, ValueEnum};
use rdfq_template::QueryShape;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rdfq", about = "Template-to-SPARQL compiler", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile template events (JSON array or JSON lines) into a query
    Compile {
        /// Events file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Query form to wrap the patterns in
        #[arg(long, value_enum)]
        shape: Option<ShapeArg>,

        /// Render alternatives as nested OPTIONALs instead of UNIONs
        #[arg(long)]
        no_union: bool,

        /// Re-resolve the template's references against this base
        #[arg(long)]
        base: Option<String>,
    },

    /// Expand inline expressions and append the parameter table
    Prepare {
        /// Query file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Base IRI for relative references
        #[arg(long)]
        system_id: Option<String>,

        /// Parameter value as name=value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },

    /// Print the variable origins recorded in a compiled query as JSON
    Origins {
        /// Query file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShapeArg {
    Select,
    Ask,
    Construct,
}

impl From<ShapeArg> for QueryShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Select => QueryShape::Select,
            ShapeArg::Ask => QueryShape::Ask,
            ShapeArg::Construct => QueryShape::Construct,
        }
    }
}
