use clap::Parser;
use rdfq_cli::cli::Cli;
use rdfq_cli::error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // --quiet and the default are silent; --verbose shows info unless RUST_LOG says otherwise
    let filter = if cli.verbose && !cli.quiet {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = rdfq_cli::run(cli) {
        exit_with_error(e);
    }
}
