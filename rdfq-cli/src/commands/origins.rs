use crate::error::CliResult;
use crate::input;
use rdfq_template::origins_from_query;
use std::path::Path;

pub fn run(file: Option<&Path>) -> CliResult<()> {
    let text = input::read_input(file)?;
    println!("{}", render(&text)?);
    Ok(())
}

/// Origin map of a compiled query as pretty JSON
pub fn render(query: &str) -> CliResult<String> {
    let origins = origins_from_query(query);
    tracing::info!(variables = origins.len(), "extracted origins");
    Ok(serde_json::to_string_pretty(&origins)?)
}
