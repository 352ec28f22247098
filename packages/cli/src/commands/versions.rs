use super::templates::initial_content;
use crate::session::Session;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use templar_editor::{AppProfile, ApplyOutcome, VersionId, VersionRef};

#[derive(Debug, Args)]
pub struct VersionsArgs {
    /// Template path relative to the base dir
    pub path: String,
}

pub fn versions(args: VersionsArgs, session: &Session) -> Result<()> {
    let active = session.versions.get_active_version(&args.path)?;
    let versions = session.versions.list_versions(&args.path)?;

    let marker = |selected: bool| if selected { "▶".green() } else { " ".normal() };

    println!(
        "{} {:<24} {}",
        marker(active.is_original()),
        "original".bold(),
        "live file".dimmed()
    );
    for version in &versions {
        println!(
            "{} {:<24} {:<30} {:<12} {}",
            marker(active.is(&version.id)),
            version.id.to_string().cyan(),
            version.name,
            version.profile.to_string().magenta(),
            version.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
        if !version.description.is_empty() {
            println!("  {:<24} {}", "", version.description.dimmed());
        }
    }

    if versions.is_empty() {
        println!();
        println!("{}", "No saved versions".dimmed());
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Template path relative to the base dir
    pub path: String,

    /// Version name
    #[arg(short, long)]
    pub name: String,

    /// Application profile (Companion, Assistant, Roleplay, Storytelling)
    #[arg(short = 't', long = "type", default_value = "Companion")]
    pub profile: AppProfile,

    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Read content from this file instead of the live template
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Activate the new version
    #[arg(long)]
    pub activate: bool,
}

pub fn create(args: CreateArgs, session: &Session) -> Result<()> {
    let content = initial_content(session, &args.path, args.file.as_deref())?;

    let version = session.versions.create_version(
        &args.path,
        &args.name,
        args.profile,
        &content,
        &args.description,
    )?;

    if args.activate {
        session
            .versions
            .set_active_version(&args.path, VersionRef::Stored(version.id.clone()))?;
    }

    println!(
        "{} Created version {} ({}) for {}",
        "✓".green(),
        version.name.bold(),
        version.id.to_string().cyan(),
        args.path
    );
    Ok(())
}

#[derive(Debug, Args)]
pub struct ActivateArgs {
    /// Template path relative to the base dir
    pub path: String,

    /// Version id or `original`
    pub version: String,
}

pub fn activate(args: ActivateArgs, session: &Session) -> Result<()> {
    let version = VersionRef::parse(&args.version);
    ensure_known(session, &args.path, &version)?;

    session.versions.set_active_version(&args.path, version.clone())?;
    println!("{} {} is now active for {}", "✓".green(), version.to_string().cyan(), args.path);
    Ok(())
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Template path relative to the base dir
    pub path: String,

    /// Version id
    pub id: String,
}

pub fn delete(args: DeleteArgs, session: &Session) -> Result<()> {
    let version = VersionRef::parse(&args.id);
    let VersionRef::Stored(id) = &version else {
        return Err(anyhow!("The original cannot be deleted"));
    };
    ensure_known(session, &args.path, &version)?;

    session.versions.delete_version(&args.path, id)?;
    println!("{} Deleted {} from {}", "✓".green(), id.to_string().cyan(), args.path);
    Ok(())
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Template path relative to the base dir
    pub path: String,

    /// Version id or `original`
    pub version: String,
}

/// Write a version over the live template (with backup) and activate it
pub fn apply(args: ApplyArgs, session: &Session) -> Result<()> {
    let version = VersionRef::parse(&args.version);
    let writer = session.templates();

    match session.versions.apply_version(&args.path, &version, writer)? {
        ApplyOutcome::Applied => {
            println!(
                "{} Wrote {} to {}",
                "✓".green(),
                version.to_string().cyan(),
                args.path
            );
            Ok(())
        }
        ApplyOutcome::NotFound => Err(anyhow!("No content for {} at {}", args.path, version)),
        ApplyOutcome::WriteFailed => Err(anyhow!(
            "Failed to write {} (is the template server running?)",
            args.path
        )),
    }
}

pub fn backup(session: &Session) -> Result<()> {
    if let Some(previous) = session.versions.original_backup_timestamp()? {
        println!("Previous backup: {}", previous.to_rfc3339().dimmed());
    }

    let timestamp = session.versions.mark_original_backup()?;
    println!(
        "{} Original templates marked as backed up at {}",
        "✓".green(),
        timestamp.to_rfc3339().cyan()
    );
    Ok(())
}

fn ensure_known(session: &Session, path: &str, version: &VersionRef) -> Result<()> {
    let VersionRef::Stored(id) = version else {
        return Ok(());
    };

    let known = session
        .versions
        .list_versions(path)?
        .iter()
        .any(|v| &v.id == id);
    if known {
        Ok(())
    } else {
        Err(unknown_version(path, id))
    }
}

fn unknown_version(path: &str, id: &VersionId) -> anyhow::Error {
    anyhow!("{} has no version {}", path, id)
}
