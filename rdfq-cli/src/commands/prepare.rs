use crate::config::FileConfig;
use crate::error::{CliError, CliResult};
use crate::input;
use rdfq_template::ParameterizedQuery;
use std::collections::HashMap;
use std::path::Path;

pub fn run(
    file: Option<&Path>,
    config: &FileConfig,
    system_id: Option<&str>,
    params: &[String],
) -> CliResult<()> {
    let text = input::read_input(file)?;
    let system_id = system_id
        .or(config.system_id.as_deref())
        .ok_or_else(|| CliError::Usage("--system-id is required (or set system_id in the config file)".into()))?;
    print!("{}", render(&text, system_id, params)?);
    Ok(())
}

/// Prepared query text
pub fn render(text: &str, system_id: &str, params: &[String]) -> CliResult<String> {
    let parameters = parse_params(params)?;
    let query = ParameterizedQuery::parse(text, system_id)?;
    tracing::info!(
        parameters = query.binding_names().count(),
        supplied = parameters.len(),
        "preparing query"
    );
    Ok(query.prepare(&parameters)?)
}

/// `name=value` pairs, repeated names collecting several values
fn parse_params(params: &[String]) -> CliResult<HashMap<String, Vec<String>>> {
    let mut parameters: HashMap<String, Vec<String>> = HashMap::new();
    for param in params {
        let (name, value) = param
            .split_once('=')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| CliError::Usage(format!("parameter '{}' is not name=value", param)))?;
        parameters
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repeated_params_collect() {
        let params = parse_params(&["a=1".into(), "b=x=y".into(), "a=2".into()]).unwrap();
        assert_eq!(params["a"], vec!["1", "2"]);
        assert_eq!(params["b"], vec!["x=y"]);
        assert!(matches!(parse_params(&["=1".into()]), Err(CliError::Usage(_))));
        assert!(matches!(parse_params(&["novalue".into()]), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_render_prepared_query() {
        let text = "SELECT * {}\nBINDINGS $n { (1) }";
        let out = render(text, "http://example.org/", &["n=7".into()]).unwrap();
        assert_eq!(out, "SELECT * {}\nBINDINGS $n {\n\t(7 )\n}\n");
    }
}
