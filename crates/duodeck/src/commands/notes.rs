use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::notes::{NotesTable, PLACEHOLDER_TARGET};
use crate::parser::{self, Deck};
use crate::presenter::timer::format_clock;

/// Print every slide with its target time and the first line of its note.
pub fn run(file: &Path, notes_path: Option<&Path>) -> Result<()> {
    let deck = parser::load(file)?;
    let notes = NotesTable::discover(file, notes_path)
        .with_context(|| format!("Failed to load speaker notes for {}", file.display()))?;

    println!("{}", deck.display_title().bold());
    if notes.is_empty() {
        println!("{}", "No speaker notes found.".yellow());
        return Ok(());
    }
    println!();
    for line in table_lines(&deck, &notes) {
        println!("{line}");
    }

    let beyond = notes.iter().filter(|n| n.slide_index > deck.len()).count();
    if beyond > 0 {
        println!(
            "{}",
            format!("{beyond} note(s) refer to slides past the end of the deck.").yellow()
        );
    }

    println!();
    println!(
        "{} {}",
        "Total target time:".bold(),
        format_clock(notes.total_target()).green()
    );
    Ok(())
}

fn table_lines(deck: &Deck, notes: &NotesTable) -> Vec<String> {
    (1..=deck.len())
        .map(|index| {
            let note = notes.lookup(index);
            let title = deck
                .slide(index)
                .and_then(|s| s.title())
                .unwrap_or("(untitled)");
            let summary = note.body.lines().next().unwrap_or_default();
            let target = if note.target == PLACEHOLDER_TARGET {
                note.target.dimmed().to_string()
            } else {
                note.target.cyan().to_string()
            };
            format!("{index:>3}  {target:>6}  {title}  {}", summary.dimmed())
        })
        .collect()
}
