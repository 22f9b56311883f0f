//! Read-only `user.name`/`user.email` lookup: `<root>/.git/config` first,
//! falling back to `$HOME/.gitconfig`. Needed to stamp author/committer
//! identity on a commit (spec.md §4.E) without inventing a full gitconfig
//! writer, which is out of scope.

use crate::error::{Error, Result};
use crate::repo::Repository;
use ini::Ini;
use std::path::Path;

/// The `[user]` identity used for a commit's author and committer lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

fn lookup(path: &Path, key: &str) -> Option<String> {
    let ini = Ini::load_from_file(path).ok()?;
    ini.get_from(Some("user"), key).map(str::to_string)
}

fn home_gitconfig() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(".gitconfig"))
}

/// Resolves `user.name`/`user.email`, preferring the repository's own
/// `.git/config` over the user's `~/.gitconfig`.
pub fn user_identity(repo: &Repository) -> Result<UserIdentity> {
    let local = repo.config_path();
    let global = home_gitconfig();

    let name = lookup(&local, "name")
        .or_else(|| global.as_deref().and_then(|p| lookup(p, "name")))
        .ok_or_else(|| Error::ConfigMissing("user.name".into()))?;
    let email = lookup(&local, "email")
        .or_else(|| global.as_deref().and_then(|p| lookup(p, "email")))
        .ok_or_else(|| Error::ConfigMissing("user.email".into()))?;

    Ok(UserIdentity { name, email })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn reads_identity_from_repo_config() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut f = std::fs::File::create(repo.config_path()).unwrap();
        writeln!(f, "[user]\n\tname = Ada Lovelace\n\temail = ada@example.com").unwrap();

        let identity = user_identity(&repo).unwrap();
        assert_eq!(identity.name, "Ada Lovelace");
        assert_eq!(identity.email, "ada@example.com");
    }

    #[test]
    fn missing_identity_is_config_missing_error() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        // SAFETY: test-only, single-threaded access to this process's environment.
        unsafe {
            std::env::remove_var("HOME");
        }
        let err = user_identity(&repo).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing(_)));
    }
}
