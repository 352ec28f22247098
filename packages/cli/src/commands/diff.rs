use crate::session::Session;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use templar_diff::{DiffKind, DiffLine, DiffStats};
use templar_editor::VersionRef;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Template path relative to the base dir
    pub path: String,

    /// Old side: version id or `original`
    #[arg(long, default_value = "original")]
    pub from: String,

    /// New side: version id or `original` (defaults to the active version)
    #[arg(long, conflicts_with = "file")]
    pub to: Option<String>,

    /// Compare against a local file instead of a stored version
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn diff(args: DiffArgs, session: &Session) -> Result<()> {
    let from = VersionRef::parse(&args.from);
    let old = session
        .versions
        .resolve_content(&args.path, &from)?
        .ok_or_else(|| anyhow!("No content for {} at {}", args.path, from))?;

    let (label, new) = match (&args.file, &args.to) {
        (Some(file), _) => (
            file.display().to_string(),
            std::fs::read_to_string(file)
                .map_err(|e| anyhow!("Failed to read {}: {}", file.display(), e))?,
        ),
        (None, to) => {
            let to = match to {
                Some(raw) => VersionRef::parse(raw),
                None => session.versions.get_active_version(&args.path)?,
            };
            let content = session
                .versions
                .resolve_content(&args.path, &to)?
                .ok_or_else(|| anyhow!("No content for {} at {}", args.path, to))?;
            (to.to_string(), content)
        }
    };

    let lines = templar_diff::compute(&old, &new);
    let stats = DiffStats::from_lines(&lines);

    println!("{} {}", "---".red(), from);
    println!("{} {}", "+++".green(), label);
    for line in &lines {
        println!("{}", colorize(line));
    }

    println!();
    if stats.is_identical() {
        println!("{}", "No differences".dimmed());
    } else {
        println!(
            "{} added, {} removed, {} unchanged",
            format!("+{}", stats.added).green(),
            format!("-{}", stats.removed).red(),
            stats.unchanged
        );
    }
    Ok(())
}

fn colorize(line: &DiffLine) -> String {
    let text = format!("{} {}", line.kind.prefix(), line.line);
    match line.kind {
        DiffKind::Added => text.green().to_string(),
        DiffKind::Removed => text.red().to_string(),
        DiffKind::Unchanged => text.normal().to_string(),
    }
}
