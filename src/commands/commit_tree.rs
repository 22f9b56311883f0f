use anyhow::{Context, Result};
use chrono::Local;
use min_git::object::{AuthorInfo, Commit};
use min_git::{Object, ObjectStore, Repository};
use std::io::{self, Read};

/// `commit-tree -p parent… tree`: builds a commit object over an explicit
/// tree oid and zero or more parents, reading the message from stdin, and
/// prints the new commit's oid.
///
/// Author/committer identity comes from `.git/config`/`~/.gitconfig`
/// (spec.md §4.E, §9 "Config"); there is no `-a`/`-m` here because spec.md's
/// CLI table puts the message on stdin, the way `commit-tree` in the
/// original always did.
pub fn run(repo: &Repository, tree: &str, parents: &[String]) -> Result<()> {
    let tree_oid = repo.resolve_prefix(tree)?;
    let parent_oids: Vec<String> = parents
        .iter()
        .map(|p| repo.resolve_prefix(p).map(|oid| oid.to_string()))
        .collect::<min_git::Result<_>>()?;

    let mut message = String::new();
    io::stdin()
        .read_to_string(&mut message)
        .context("reading commit message from stdin")?;

    let identity = min_git::config::user_identity(repo)?;
    let now = Local::now();
    let author = AuthorInfo::new(
        identity.name.clone(),
        identity.email.clone(),
        now.timestamp(),
        now.format("%z").to_string(),
    )?;
    let committer = author.clone();

    let commit = Commit::new(tree_oid.to_string(), parent_oids, author, committer, message);
    let store = ObjectStore::new(repo);
    let oid = store.write_object(&Object::Commit(commit))?;
    println!("{oid}");
    Ok(())
}
