pub(crate) mod archive;
pub(crate) mod chd;
pub(crate) mod config;
pub(crate) mod extensions;
pub(crate) mod identify;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romsort_core::ConsoleId;

/// Console name colored by how sure the answer is.
pub(crate) fn console_label(console: ConsoleId) -> String {
    let name = console.display_name();
    match console {
        ConsoleId::Known(_) => name.if_supports_color(Stdout, |t| t.green()).to_string(),
        ConsoleId::DiscImage => name.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        ConsoleId::Unknown => name.if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    }
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), crate::CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
