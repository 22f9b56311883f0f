use clap::{Parser, Subcommand};
use min_git::Repository;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

/// A minimal, Git-compatible content-addressed version control core:
/// object store, object model, and staging index.
#[derive(Parser, Debug)]
#[command(name = "min-git")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Creates the `.git` directory layout in the current directory.
    Init,
    /// Hashes a file as a blob, optionally writing it to the object store.
    HashObject {
        #[arg(short = 'w', long = "write")]
        write: bool,
        file: PathBuf,
    },
    /// Prints an object's type (`-t`) or pretty-printed content (`-p`).
    CatFile {
        #[arg(short = 't', conflicts_with = "pretty_print")]
        show_type: bool,
        #[arg(short = 'p')]
        pretty_print: bool,
        id: String,
    },
    /// Prints the contents of the staging index, one entry per line.
    LsFiles {
        #[arg(long)]
        debug: bool,
    },
    /// Stages paths: `--add` creates/replaces entries; otherwise refreshes
    /// already-tracked paths whose stat cache is stale.
    UpdateIndex {
        #[arg(long)]
        add: bool,
        paths: Vec<PathBuf>,
    },
    /// Builds the tree object graph for the current index, printing the
    /// root tree's oid.
    WriteTree,
    /// Replaces the current index with the flattened contents of a tree.
    ReadTree { tree: String },
    /// Creates a commit object over an explicit tree and parents, reading
    /// the commit message from stdin.
    CommitTree {
        #[arg(short = 'p', action = clap::ArgAction::Append)]
        parent: Vec<String>,
        tree: String,
    },
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Init => commands::init::run(),
        Command::HashObject { write, file } => {
            let repo = Repository::discover()?;
            commands::hash_object::run(&repo, &file, write)
        }
        Command::CatFile {
            show_type,
            pretty_print,
            id,
        } => {
            let repo = Repository::discover()?;
            commands::cat_file::run(&repo, &id, show_type, pretty_print)
        }
        Command::LsFiles { debug } => {
            let repo = Repository::discover()?;
            commands::ls_files::run(&repo, debug)
        }
        Command::UpdateIndex { add, paths } => {
            let repo = Repository::discover()?;
            commands::update_index::run(&repo, add, &paths)
        }
        Command::WriteTree => {
            let repo = Repository::discover()?;
            commands::write_tree::run(&repo)
        }
        Command::ReadTree { tree } => {
            let repo = Repository::discover()?;
            commands::read_tree::run(&repo, &tree)
        }
        Command::CommitTree { parent, tree } => {
            let repo = Repository::discover()?;
            commands::commit_tree::run(&repo, &tree, &parent)
        }
    }
}

/// Exit codes per spec.md §7: `0` on success, `1` on any user-visible error
/// with a one-line diagnostic on stderr.
fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
