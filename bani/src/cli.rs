use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bani: browse and edit a coin and banknote catalog stored as JSON files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory of the catalog.
    #[arg(long, global = true, env = "BANI_CATALOG", default_value = ".")]
    pub catalog: PathBuf,

    /// Increase verbosity (use multiple times for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List issuers with their emissions.
    Issuers(IssuersArgs),
    /// Show the document hierarchy found in the catalog directory.
    Tree,
    /// Replace the comments of an issuer.
    Comment(CommentArgs),
    /// Delete an issuer document.
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct IssuersArgs {
    /// Only show issuers whose name contains this text (case-insensitive).
    #[arg(long, short)]
    pub name: Option<String>,

    /// Only show emissions still running in or after this year.
    #[arg(long)]
    pub from: Option<i32>,

    /// Only show emissions started in or before this year.
    #[arg(long)]
    pub to: Option<i32>,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Id (document path) of the issuer.
    #[arg(required = true)]
    pub issuer_id: String,

    /// New comments. An empty string clears them.
    #[arg(required = true)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Id (document path) of the issuer.
    #[arg(required = true)]
    pub issuer_id: String,

    /// Do not ask for confirmation.
    #[arg(long, short)]
    pub force: bool,
}
