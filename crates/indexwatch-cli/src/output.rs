//! Snapshot rendering for stdout.

use std::fmt::Write as _;
use std::io::Write as _;

use indexwatch_core::{Direction, InstrumentRegistry, QuoteDisplay, Snapshot};

use crate::cli::OutputFormat;
use crate::error::CliError;

const NAME_WIDTH: usize = 26;
const PRICE_WIDTH: usize = 14;
const CHANGE_WIDTH: usize = 10;

pub fn render_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<(), CliError> {
    let text = match format {
        OutputFormat::Table => snapshot_table(snapshot),
        OutputFormat::Json => serde_json::to_string(snapshot)?,
    };
    write_stdout(&text)
}

pub fn render_registry(registry: &InstrumentRegistry, format: OutputFormat) -> Result<(), CliError> {
    let text = match format {
        OutputFormat::Table => registry_table(registry),
        OutputFormat::Json => serde_json::to_string(registry.as_slice())?,
    };
    write_stdout(&text)
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

pub fn snapshot_table(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Last update {} UTC (cycle {})",
        snapshot.taken_at().format_clock(),
        snapshot.cycle()
    );
    let _ = writeln!(
        out,
        "{:<NAME_WIDTH$} {:>PRICE_WIDTH$}   {:>CHANGE_WIDTH$}",
        "Instrument", "Price", "Change"
    );

    for row in snapshot.rows() {
        let display = QuoteDisplay::of(&row.quote);
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$} {:>PRICE_WIDTH$} {} {:>CHANGE_WIDTH$}",
            row.instrument.display_name,
            display.price,
            direction_marker(display.direction),
            display.change
        );
    }

    out.truncate(out.trim_end().len());
    out
}

pub fn registry_table(registry: &InstrumentRegistry) -> String {
    registry
        .iter()
        .enumerate()
        .map(|(position, instrument)| {
            format!(
                "{:>2}. {:<NAME_WIDTH$} {:<12} {}",
                position + 1,
                instrument.display_name,
                instrument.source_kind,
                instrument.source_key
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const fn direction_marker(direction: Direction) -> char {
    match direction {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Flat => ' ',
    }
}
