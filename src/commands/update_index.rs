use anyhow::{Context, Result};
use ignore::WalkBuilder;
use min_git::index::ops;
use min_git::{ObjectStore, Repository};
use std::path::{Path, PathBuf};

/// `update-index [--add] paths…`: without `--add`, refreshes the named
/// paths' stat cache and oid per spec.md §4.G.refresh, failing on any path
/// not already tracked; with `--add`, stages each path fresh (creating its
/// entry if it's new) per spec.md §4.G.add.
///
/// A path naming a directory is expanded to the files under it (honoring
/// `.gitignore`-style rules via `ignore::WalkBuilder`, the same crate and
/// walking strategy the teacher uses for its working-tree walk) — spec.md
/// §6 takes `paths…`, and a directory is still a path, just one `add`
/// stages recursively rather than as a single entry.
pub fn run(repo: &Repository, add: bool, paths: &[PathBuf]) -> Result<()> {
    let store = ObjectStore::new(repo);
    let mut index = ops::load(repo)?;

    if add {
        for path in paths {
            let relative_paths = expand_path(repo, path)?;
            for relative in &relative_paths {
                ops::add(repo, &store, &mut index, relative)?;
            }
        }
    } else {
        let relative: Vec<String> = paths
            .iter()
            .map(|p| repo.relative_to_root(p))
            .collect::<min_git::Result<_>>()?;
        ops::refresh(repo, &store, &mut index, &relative)?;
    }

    ops::store(repo, &index)?;
    Ok(())
}

/// Resolves `path` (relative to the current working directory) to the list
/// of repository-root-relative file paths it names: itself, if it's a
/// regular file or symlink; every file beneath it, if it's a directory.
fn expand_path(repo: &Repository, path: &Path) -> Result<Vec<String>> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("reading current directory")?
            .join(path)
    };
    let metadata = std::fs::symlink_metadata(&absolute)
        .with_context(|| format!("stat {}", absolute.display()))?;
    if !metadata.is_dir() {
        return Ok(vec![repo.relative_to_root(path)?]);
    }

    // ignore::Walk has no built-in way to skip `.git` itself, so it's
    // filtered out by name the way the teacher's working-tree walker does.
    let mut relative_paths = Vec::new();
    for result in WalkBuilder::new(&absolute).hidden(false).build() {
        let entry = result.with_context(|| format!("walking {}", absolute.display()))?;
        if entry.file_name() == ".git" {
            continue;
        }
        if entry.file_type().is_some_and(|ft| ft.is_file() || ft.is_symlink()) {
            relative_paths.push(repo.relative_to_root(entry.path())?);
        }
    }
    Ok(relative_paths)
}
