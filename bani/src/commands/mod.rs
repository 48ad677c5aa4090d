use std::path::Path;

use anyhow::{Context, Result};
use bani_core::catalog::{Artifact, Emission, Issuer, UnitOfWork};
use bani_core::storage::{DocumentStore, NodeId};
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};
use tracing::{debug, info};

use crate::cli::{CommentArgs, IssuersArgs, RemoveArgs};

const WRAP_WIDTH: usize = 80;

// --- Handler Functions ---

pub async fn handle_issuers(args: IssuersArgs, catalog: &Path) -> Result<()> {
    let mut uow = open(catalog).await?;
    let repository = uow.issuers();

    let issuers = match args.name.as_deref() {
        Some(name) => repository.get_by_name(name),
        None => repository.get_all(),
    };
    debug!("Presenting {} issuers", issuers.len());

    if issuers.is_empty() {
        println!("No issuers found in {}", catalog.display());
        return Ok(());
    }

    for issuer in issuers {
        print_issuer(issuer, args.from, args.to);
    }
    Ok(())
}

pub async fn handle_tree(catalog: &Path) -> Result<()> {
    let store = DocumentStore::open(catalog)
        .await
        .with_context(|| format!("Failed to read catalog at {}", catalog.display()))?;
    let forest = store.forest();

    if forest.is_empty() {
        println!("No documents found in {}", catalog.display());
        return Ok(());
    }

    let mut stack: Vec<(NodeId, usize)> = forest.roots().iter().rev().map(|&id| (id, 0)).collect();
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = forest.get(id) else { continue };
        let location = if node.directories().is_empty() {
            String::new()
        } else {
            format!("{}/", node.directories().join("/"))
        };
        println!(
            "{}{}{}",
            "  ".repeat(depth),
            style(location).dim(),
            style(node.file_name()).bold()
        );
        stack.extend(forest.children(id).iter().rev().map(|&child| (child, depth + 1)));
    }
    Ok(())
}

pub async fn handle_comment(args: CommentArgs, catalog: &Path) -> Result<()> {
    let mut uow = open(catalog).await?;

    let mut issuer = uow
        .issuers()
        .get_by_id(&args.issuer_id)
        .cloned()
        .with_context(|| format!("Issuer not found: {}", args.issuer_id))?;
    issuer.comments = Some(args.text).filter(|text| !text.is_empty());

    uow.issuers().update(&issuer)?;
    uow.save_changes().await.context("Failed to save comments")?;
    info!(id = %issuer.id(), "Comments updated");
    println!("Updated comments of {}", style(display_name(&issuer)).bold());
    Ok(())
}

pub async fn handle_remove(args: RemoveArgs, catalog: &Path) -> Result<()> {
    let mut uow = open(catalog).await?;

    let name = uow
        .issuers()
        .get_by_id(&args.issuer_id)
        .map(|issuer| display_name(issuer).to_string())
        .with_context(|| format!("Issuer not found: {}", args.issuer_id))?;

    if !args.force && !confirm(format!("Delete issuer '{name}'?")).await? {
        println!("Nothing removed.");
        return Ok(());
    }

    uow.issuers().remove(&args.issuer_id)?;
    uow.save_changes().await.context("Failed to remove issuer")?;
    println!("Removed {}", style(name).bold());
    Ok(())
}

// --- Helpers ---

async fn open(catalog: &Path) -> Result<UnitOfWork> {
    UnitOfWork::open(catalog)
        .await
        .with_context(|| format!("Failed to open catalog at {}", catalog.display()))
}

// dialoguer blocks, keep it off the runtime threads.
async fn confirm(prompt: String) -> Result<bool> {
    let answer = tokio::task::spawn_blocking(move || {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    })
    .await
    .context("Blocking task failed (panic)")??;
    Ok(answer)
}

fn display_name(issuer: &Issuer) -> &str {
    issuer.name.as_deref().unwrap_or("(unnamed)")
}

fn print_issuer(issuer: &Issuer, from: Option<i32>, to: Option<i32>) {
    println!("{}", style(display_name(issuer)).bold().cyan());
    println!("  {}", style(issuer.id()).dim());

    if let Some(comments) = issuer.comments.as_deref() {
        let options = textwrap::Options::new(WRAP_WIDTH)
            .initial_indent("  ")
            .subsequent_indent("  ");
        println!("{}", textwrap::fill(comments, options));
    }

    for emission in issuer.emissions.iter().filter(|e| e.is_between(from, to)) {
        print_emission(emission);
    }
    println!();
}

fn print_emission(emission: &Emission) {
    let period = match (emission.start_year, emission.end_year) {
        (Some(start), Some(end)) => format!("{start}-{end}"),
        (Some(start), None) => format!("{start}-"),
        (None, Some(end)) => format!("-{end}"),
        (None, None) => "?".to_string(),
    };
    let coins = emission.artifacts.iter().filter(|a| a.is_coin()).count();
    let banknotes = emission.artifacts.iter().filter(|a| a.is_banknote()).count();

    println!(
        "  - {} {} ({} coins, {} banknotes)",
        emission.name.as_deref().unwrap_or("(unnamed emission)"),
        style(period).yellow(),
        coins,
        banknotes
    );
    for artifact in &emission.artifacts {
        println!("      {}", describe_artifact(artifact));
    }
}

fn describe_artifact(artifact: &Artifact) -> String {
    let name = artifact
        .display_name
        .clone()
        .or_else(|| match (artifact.value, artifact.unit.as_deref()) {
            (Some(value), Some(unit)) => Some(format!("{value} {unit}")),
            (Some(value), None) => Some(value.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "(unnamed)".to_string());
    match artifact.year {
        Some(year) => format!("{name} ({year}) x{}", artifact.instance_count),
        None => format!("{name} x{}", artifact.instance_count),
    }
}
