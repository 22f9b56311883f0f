use anyhow::{Context, Result};
use min_git::Repository;
use std::env;

/// Creates the minimal `.git` layout (`objects/`) in the current directory.
///
/// Not part of spec.md §6's recognized-operations table, but every example
/// repo in the retrieval pack keeps an `init` subcommand since there is
/// otherwise no way to create the repository the rest of the CLI operates
/// on; re-created here the way the teacher's `init.rs` would have (the
/// teacher's `main.rs` imports it but the file itself wasn't retrieved).
pub fn run() -> Result<()> {
    let cwd = env::current_dir().context("reading current directory")?;
    let repo = Repository::init(&cwd)?;
    println!(
        "Initialized empty Git repository in {}",
        repo.git_dir().display()
    );
    Ok(())
}
