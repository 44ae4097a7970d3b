//! Console output: catalog prompt, result tables and live notifications

use std::io::{self, Write};

use dg_core::session::GameReport;
use dg_core::{Notifier, Player, RoleCatalog};
use strum::{Display, EnumString, VariantNames};

/// How the end-of-setup report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames, Default)]
#[strum(serialize_all = "lowercase")]
pub enum OutputMode {
    /// Tables, like the console prototype
    #[default]
    Text,
    /// One JSON document
    Json,
}

/// Prints notifications to stdout as `[name] text`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, player: &Player, text: &str) {
        println!("[{}] {}", player.name(), text);
    }
}

/// List every catalog entry with the index to vote for it
pub fn print_catalog<W: Write>(out: &mut W, catalog: &RoleCatalog) -> io::Result<()> {
    for (index, entry) in catalog.entries().iter().enumerate() {
        writeln!(out, "{:>19}: {}", catalog.name(*entry), index)?;
    }
    writeln!(out, "{:>19}: {}", "RANDOM", "Any other numbers")
}

pub fn print_report<W: Write>(out: &mut W, report: &GameReport, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::other)?;
            writeln!(out)
        }
        OutputMode::Text => print_tables(out, report),
    }
}

fn print_tables<W: Write>(out: &mut W, report: &GameReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{:=^79}", " Vote ")?;
    for line in &report.votes {
        writeln!(out, "{:15}-> {}", line.player, line.vote)?;
    }
    writeln!(out)?;

    writeln!(out, "{:=^79}", " Result ")?;
    for line in &report.results {
        writeln!(out, "{:15}-> {}", line.player, line.role)?;
    }
    writeln!(out)?;

    writeln!(out, "matches: {}", report.matches)?;
    for killer in &report.killers {
        writeln!(out, "Killer: {killer}")?;
    }
    Ok(())
}
