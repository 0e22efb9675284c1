use crate::error::{CliError, CliResult};
use rdfq_graph_ir::Event;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// Read a file, or stdin when no file is given.
pub fn read_input(file: Option<&Path>) -> CliResult<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display()))),
        None => {
            if io::stdin().is_terminal() {
                return Err(CliError::Input(format!(
                    "no input provided\n  {} pass a file or pipe via stdin",
                    colored::Colorize::bold(colored::Colorize::cyan("help:"))
                )));
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Events from a JSON array, or one JSON event per line.
pub fn parse_events(text: &str) -> CliResult<Vec<Event>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| CliError::Input(format!("line {}: JSON parse error: {e}", i + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_and_lines_agree() {
        let array = r#"["start_document", {"base": "http://example.org/"}, "end_document"]"#;
        let lines = "\"start_document\"\n\n{\"base\": \"http://example.org/\"}\n\"end_document\"\n";
        let events = parse_events(array).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events, parse_events(lines).unwrap());
        assert_eq!(events[1], Event::base("http://example.org/"));
    }

    #[test]
    fn test_bad_line_is_reported() {
        let err = parse_events("\"start_document\"\n{oops}\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
