//! Turn dispatch results into terminal lines.

use cliengine_terminal::{ResultObject, kind};
use cliengine_types::result::INTERNAL_ERROR;

/// Field carrying a handler's user-facing text.
pub const MESSAGE: &str = "message";

/// Lines to print for `result`.
pub fn render(result: &ResultObject) -> Vec<String> {
    let mut lines = Vec::new();
    match result.kind() {
        kind::EXIT | kind::EMPTY => {},
        kind::HELP => {
            lines.push(String::new());
            lines.extend(text_lines(result.get_str("content").unwrap_or_default()));
            lines.push(String::new());
        },
        kind::UNKNOWN_COMMAND => {
            let input = result.get_str("input").unwrap_or_default();
            lines.push(format!("Unknown command: '{input}'."));
            let suggestions: Vec<&str> = result
                .get("suggestions")
                .and_then(|v| v.as_array())
                .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
                .unwrap_or_default();
            if !suggestions.is_empty() {
                lines.push(format!("Did you mean: {}?", suggestions.join(", ")));
            }
            lines.push("Use 'help' for a list of commands available.".to_string());
        },
        kind::INVALID_ARGUMENT => {
            let command = result.get_str("command").unwrap_or_default();
            let message = result.get_str(MESSAGE).unwrap_or("invalid arguments");
            lines.push(format!("Invalid input for '{command}': {message}."));
            lines.push(format!("Use 'help {command}' for usage."));
        },
        kind::FAILED if result.get_str("reason") == Some(INTERNAL_ERROR) => {
            let command = result.get_str("command").unwrap_or_default();
            lines.push(format!("Command '{command}' failed unexpectedly; see the log for details."));
        },
        kind::INTERRUPTED => {
            lines.push("Process interrupted.".to_string());
        },
        kind::SUCCESS | kind::FAILED => {
            lines.extend(text_lines(result.get_str(MESSAGE).unwrap_or_default()));
        },
        other => {
            log::warn!("no renderer for result type '{other}'");
            lines.push(format!("Unknown result type: {other}"));
        },
    }
    lines
}

fn text_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().map(str::to_string)
}
