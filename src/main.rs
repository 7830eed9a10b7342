use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use git_rs::Repository;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "git-rs", about = "A from-scratch, on-disk-compatible Git core")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty repository.
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Print the contents of an object, verifying its declared kind.
    CatFile { kind: String, object: String },
    /// Compute (and optionally store) the object id for a file's content.
    HashObject {
        #[arg(short = 'w')]
        write: bool,
        #[arg(short = 't', default_value = "blob")]
        kind: String,
        file: PathBuf,
    },
    /// Print the commit history reachable from a starting point.
    Log { commit: Option<String> },
    /// List a tree's entries.
    LsTree {
        #[arg(short = 'r')]
        recursive: bool,
        tree: String,
    },
    /// Materialize a commit's tree into an empty directory.
    Checkout { commit: String, target: PathBuf },
    /// List every reference and the object it resolves to.
    ShowRef,
    /// List tags, or create a lightweight or annotated tag.
    Tag {
        #[arg(short = 'a')]
        annotate: bool,
        name: Option<String>,
        object: Option<String>,
    },
    /// Resolve a name to a single object id.
    RevParse {
        #[arg(long = "wyag-type")]
        kind: Option<String>,
        name: String,
    },
    /// List the paths currently staged in the index.
    LsFiles {
        #[arg(long)]
        verbose: bool,
    },
    /// Print which of the given paths are ignored.
    CheckIgnore { paths: Vec<String> },
    /// Show the difference between HEAD, the index, and the working tree.
    Status,
    /// Remove paths from the index and the working tree.
    Rm { paths: Vec<String> },
    /// Stage paths into the index.
    Add { paths: Vec<String> },
    /// Record a new commit from the current index.
    Commit {
        #[arg(short = 'm')]
        message: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,git_rs=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Init { path } => cli::init::run(path)?,
        Command::CatFile { kind, object } => {
            let repo = Repository::find(".")?;
            cli::cat_file::run(&repo, &kind, &object)?;
        }
        Command::HashObject { write, kind, file } => cli::hash_object::run(write, &kind, file)?,
        Command::Log { commit } => {
            let repo = Repository::find(".")?;
            cli::log::run(&repo, commit.as_deref())?;
        }
        Command::LsTree { recursive, tree } => {
            let repo = Repository::find(".")?;
            cli::ls_tree::run(&repo, recursive, &tree)?;
        }
        Command::Checkout { commit, target } => cli::checkout::run(&commit, target)?,
        Command::ShowRef => {
            let repo = Repository::find(".")?;
            cli::show_ref::run(&repo)?;
        }
        Command::Tag {
            annotate,
            name,
            object,
        } => {
            let repo = Repository::find(".")?;
            cli::tag::run(&repo, annotate, name.as_deref(), object.as_deref())?;
        }
        Command::RevParse { kind, name } => {
            let repo = Repository::find(".")?;
            cli::rev_parse::run(&repo, kind.as_deref(), &name)?;
        }
        Command::LsFiles { verbose } => {
            let repo = Repository::find(".")?;
            cli::ls_files::run(&repo, verbose)?;
        }
        Command::CheckIgnore { paths } => {
            let repo = Repository::find(".")?;
            cli::check_ignore::run(&repo, &paths)?;
        }
        Command::Status => {
            let repo = Repository::find(".")?;
            cli::status::run(&repo)?;
        }
        Command::Rm { paths } => {
            let repo = Repository::find(".")?;
            cli::rm::run(&repo, &paths)?;
        }
        Command::Add { paths } => {
            let repo = Repository::find(".")?;
            cli::add::run(&repo, &paths)?;
        }
        Command::Commit { message } => {
            let repo = Repository::find(".")?;
            cli::commit::run(&repo, &message)?;
        }
    }
    Ok(())
}
