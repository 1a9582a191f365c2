//! Rendering for the `--output` formats.
//!
//! Every command funnels its result through one of two dispatchers here
//! so the format flag behaves identically everywhere: `tabled` for the
//! interactive table view, serde for the structured formats, and a
//! caller-supplied id projection for `plain`.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Whether notices and prompts may use ANSI color.
///
/// Probes stderr rather than stdout: that is where notices land, and
/// stdout is frequently a pipe even in interactive runs.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Dispatchers ──────────────────────────────────────────────────────

/// Render a collection of records.
///
/// `to_row` shapes each record into its `Tabled` row type for the table
/// view; the structured formats serialize the records themselves, so
/// json/yaml output carries every field, not just the table columns.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(&rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => to_json(data, false),
        OutputFormat::JsonCompact => to_json(data, true),
        OutputFormat::Yaml => to_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one record.
///
/// Detail views are hand-formatted label/value text rather than a
/// one-row table, so the table arm takes a `detail_fn` instead of a
/// `Tabled` bound.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => to_json(data, false),
        OutputFormat::JsonCompact => to_json(data, true),
        OutputFormat::Yaml => to_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Write rendered output to stdout unless `--quiet` asked for silence.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Serde renderers ──────────────────────────────────────────────────

fn to_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(data).expect("serialization should not fail")
    } else {
        serde_json::to_string_pretty(data).expect("serialization should not fail")
    }
}

fn to_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
