use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde_json::json;

use romsort_core::extension::{ambiguous_rules, direct_rules};

use super::{console_label, print_json};
use crate::{CliError, Output};

/// Run the extensions command.
pub(crate) fn run_extensions(out: Output) -> Result<(), CliError> {
    if out.json {
        let direct: Vec<_> = direct_rules()
            .iter()
            .map(|(ext, console)| json!({ "extension": ext, "console": console }))
            .collect();
        let ambiguous: Vec<_> = ambiguous_rules()
            .iter()
            .map(|rule| {
                let candidates: Vec<_> = rule
                    .candidates
                    .iter()
                    .map(|c| json!({ "console": c.console, "hints": c.hints }))
                    .collect();
                json!({ "extension": rule.extension, "candidates": candidates })
            })
            .collect();
        return print_json(&json!({ "direct": direct, "ambiguous": ambiguous }));
    }

    log::info!("{}", "Direct extensions:".if_supports_color(Stdout, |t| t.bold()));
    for (ext, console) in direct_rules() {
        log::info!("  {:<8} {}", ext, console_label(*console));
    }

    crate::log_blank();
    log::info!(
        "{}",
        "Shared extensions (first candidate is the default):"
            .if_supports_color(Stdout, |t| t.bold()),
    );
    for rule in ambiguous_rules() {
        log::info!("  {}", rule.extension.if_supports_color(Stdout, |t| t.cyan()));
        for candidate in rule.candidates {
            log::info!(
                "    {:<32} {}",
                console_label(candidate.console),
                candidate
                    .hints
                    .join(", ")
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}
