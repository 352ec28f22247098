use crate::session::Session;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeSet;
use templar_editor::{OriginalSource, VersionRef};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only templates whose file name or category contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Only templates that have stored versions
    #[arg(long)]
    pub modified: bool,
}

pub fn list(args: ListArgs, session: &Session) -> Result<()> {
    let templates = session.templates().list()?;
    let tracked: BTreeSet<String> = session.versions.tracked_templates()?.into_iter().collect();

    let matches = templar_catalog::search(&templates, args.filter.as_deref().unwrap_or(""));
    let shown: Vec<_> = matches
        .into_iter()
        .filter(|path| !args.modified || tracked.contains(path.as_str()))
        .collect();

    if shown.is_empty() {
        println!("{}", "No templates found".yellow());
        return Ok(());
    }

    for path in &shown {
        let category = templar_catalog::category_for_path(path)
            .map(|c| c.name)
            .unwrap_or("Other");
        let marker = if tracked.contains(path.as_str()) {
            "●".cyan()
        } else {
            " ".normal()
        };
        println!("{} {} {}", marker, path, format!("[{}]", category).dimmed());
    }

    println!();
    println!(
        "{} templates from {}",
        shown.len().to_string().bold(),
        session.templates().describe()
    );
    Ok(())
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Template path relative to the base dir
    pub path: String,

    /// Version id or `original` (defaults to the active version)
    #[arg(short, long)]
    pub version: Option<String>,
}

pub fn show(args: ShowArgs, session: &Session) -> Result<()> {
    let version = match args.version.as_deref() {
        Some(raw) => VersionRef::parse(raw),
        None => session.versions.get_active_version(&args.path)?,
    };

    let content = session
        .versions
        .resolve_content(&args.path, &version)?
        .ok_or_else(|| anyhow!("No content for {} at {}", args.path, version))?;

    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct VarsArgs {
    /// Template path or category name
    pub target: String,
}

pub fn vars(args: VarsArgs, _session: &Session) -> Result<()> {
    let category = templar_catalog::category(&args.target)
        .or_else(|| templar_catalog::category_for_path(&args.target))
        .ok_or_else(|| anyhow!("No template category matches {}", args.target))?;

    println!(
        "{} {}",
        category.name.bright_blue().bold(),
        category.description.dimmed()
    );
    println!("{}", category.base_path().dimmed());

    for group in templar_catalog::grouped_variables(category) {
        println!();
        println!("{}", group.name.bold());
        for variable in group.variables {
            println!(
                "  {:<32} {:<14} {}",
                variable.name.green(),
                variable.kind.cyan(),
                variable.description
            );
        }
    }
    Ok(())
}

/// Content a new version starts from: a file if given, else the live template
pub(crate) fn initial_content(
    session: &Session,
    path: &str,
    file: Option<&std::path::Path>,
) -> Result<String> {
    match file {
        Some(file) => std::fs::read_to_string(file)
            .map_err(|e| anyhow!("Failed to read {}: {}", file.display(), e)),
        None => session
            .templates()
            .fetch_original(path)
            .ok_or_else(|| anyhow!("Template not found: {}", path)),
    }
}
