use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// Author or committer identity: name, email, unix timestamp and a
/// `[+-]HHMM` timezone offset string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
    pub unix_seconds: i64,
    pub tz_offset: String,
}

impl AuthorInfo {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        unix_seconds: i64,
        tz_offset: impl Into<String>,
    ) -> Result<Self> {
        let tz_offset = tz_offset.into();
        validate_tz_offset(&tz_offset)?;
        Ok(Self {
            name: name.into(),
            email: email.into(),
            unix_seconds,
            tz_offset,
        })
    }

    fn format(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name, self.email, self.unix_seconds, self.tz_offset
        )
    }
}

fn validate_tz_offset(tz: &str) -> Result<()> {
    let bytes = tz.as_bytes();
    let valid = bytes.len() == 5
        && (bytes[0] == b'+' || bytes[0] == b'-')
        && bytes[1..].iter().all(|b| b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(Error::MalformedCommit(format!(
            "timezone offset must match [+-]HHMM, got {tz}"
        )))
    }
}

/// A content-addressed snapshot pointer: a tree oid (kept as hex text, the
/// way it's stored in the object), zero or more parent oids, author and
/// committer identity, and a verbatim UTF-8 message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub tree: String,
    pub parents: Vec<String>,
    pub author: AuthorInfo,
    pub committer: AuthorInfo,
    pub message: String,
}

impl Commit {
    pub fn new(
        tree: impl Into<String>,
        parents: Vec<String>,
        author: AuthorInfo,
        committer: AuthorInfo,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree: tree.into(),
            parents,
            author,
            committer,
            message: message.into(),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(&format!("tree {}\n", self.tree));
        for parent in &self.parents {
            out.push_str(&format!("parent {parent}\n"));
        }
        out.push_str(&format!("author {}\n", self.author.format()));
        out.push_str(&format!("committer {}\n", self.committer.format()));
        out.push('\n');
        out.push_str(&self.message);
        out.into_bytes()
    }

    pub fn parse(content: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(content);

        expect_token(&mut cursor, "tree")?;
        let tree = read_hex_line(&mut cursor, "tree")?;

        let mut parents = Vec::new();
        while cursor.starts_with(b"parent ") {
            expect_token(&mut cursor, "parent")?;
            parents.push(read_hex_line(&mut cursor, "parent")?);
        }

        expect_token(&mut cursor, "author")?;
        let author = parse_author_line(&mut cursor)?;

        expect_token(&mut cursor, "committer")?;
        let committer = parse_author_line(&mut cursor)?;

        let blank = cursor
            .read_until(b'\n')
            .ok_or_else(|| Error::MalformedCommit("missing header/message separator".into()))?;
        if !blank.is_empty() {
            return Err(Error::MalformedCommit(
                "expected blank line before message".into(),
            ));
        }

        let message = String::from_utf8(cursor.read_all().to_vec())
            .map_err(|_| Error::MalformedCommit("message is not valid UTF-8".into()))?;

        Ok(Commit {
            tree,
            parents,
            author,
            committer,
            message,
        })
    }

    /// The canonical commit content, verbatim — spec.md §6's "pretty
    /// content" for a commit.
    pub fn pretty_print(&self) -> String {
        String::from_utf8_lossy(&self.serialize()).into_owned()
    }
}

/// Reads the next space-delimited token and confirms it equals `expected`.
/// Per spec.md §4.E, any mismatch other than the (already handled by the
/// caller's loop condition) zero-parents case is `MalformedCommit`.
fn expect_token(cursor: &mut Cursor, expected: &str) -> Result<()> {
    let token = cursor
        .read_until(b' ')
        .ok_or_else(|| Error::MalformedCommit(format!("expected '{expected}' header")))?;
    if token == expected.as_bytes() {
        Ok(())
    } else {
        Err(Error::MalformedCommit(format!(
            "expected '{expected}' header, got '{}'",
            String::from_utf8_lossy(token)
        )))
    }
}

fn read_hex_line(cursor: &mut Cursor, field: &str) -> Result<String> {
    let line = cursor
        .read_until(b'\n')
        .ok_or_else(|| Error::MalformedCommit(format!("unterminated {field} line")))?;
    String::from_utf8(line.to_vec())
        .map_err(|_| Error::MalformedCommit(format!("{field} oid is not valid UTF-8")))
}

fn parse_author_line(cursor: &mut Cursor) -> Result<AuthorInfo> {
    let name_and_space = cursor
        .read_until(b'<')
        .ok_or_else(|| Error::MalformedCommit("missing '<' before author email".into()))?;
    let name = std::str::from_utf8(name_and_space)
        .map_err(|_| Error::MalformedCommit("author name is not valid UTF-8".into()))?
        .trim_end()
        .to_string();
    let email_bytes = cursor
        .read_until(b'>')
        .ok_or_else(|| Error::MalformedCommit("missing '>' after author email".into()))?;
    let email = std::str::from_utf8(email_bytes)
        .map_err(|_| Error::MalformedCommit("author email is not valid UTF-8".into()))?
        .to_string();
    let sep = cursor
        .read_n(1)
        .ok_or_else(|| Error::MalformedCommit("truncated author line".into()))?;
    if sep != b" " {
        return Err(Error::MalformedCommit(
            "expected space after author email".into(),
        ));
    }
    let unix_bytes = cursor
        .read_until(b' ')
        .ok_or_else(|| Error::MalformedCommit("missing author timestamp".into()))?;
    let unix_str = std::str::from_utf8(unix_bytes)
        .map_err(|_| Error::MalformedCommit("author timestamp is not valid UTF-8".into()))?;
    let unix_seconds: i64 = unix_str
        .parse()
        .map_err(|_| Error::MalformedCommit(format!("invalid timestamp: {unix_str}")))?;
    let tz_bytes = cursor
        .read_until(b'\n')
        .ok_or_else(|| Error::MalformedCommit("unterminated author line".into()))?;
    let tz_offset = std::str::from_utf8(tz_bytes)
        .map_err(|_| Error::MalformedCommit("author timezone is not valid UTF-8".into()))?
        .to_string();
    AuthorInfo::new(name, email, unix_seconds, tz_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> AuthorInfo {
        AuthorInfo::new("A", "a@x", 0, "+0000").unwrap()
    }

    #[test]
    fn s4_commit_tree_serializes_exactly() {
        let commit = Commit::new(
            "aa5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2",
            vec![],
            author(),
            author(),
            "msg\n",
        );
        let expected = b"tree aa5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2\n\
author A <a@x> 0 +0000\n\
committer A <a@x> 0 +0000\n\
\n\
msg\n";
        assert_eq!(commit.serialize(), expected.to_vec());
    }

    #[test]
    fn round_trips_with_multiple_parents() {
        let commit = Commit::new(
            "a".repeat(40),
            vec!["b".repeat(40), "c".repeat(40)],
            author(),
            author(),
            "multi-parent\n",
        );
        let encoded = commit.serialize();
        let decoded = Commit::parse(&encoded).unwrap();
        assert_eq!(decoded, commit);
    }

    #[test]
    fn rejects_bad_timezone() {
        assert!(AuthorInfo::new("A", "a@x", 0, "bogus").is_err());
    }

    #[test]
    fn message_without_trailing_newline_is_preserved() {
        let commit = Commit::new("a".repeat(40), vec![], author(), author(), "no newline");
        let decoded = Commit::parse(&commit.serialize()).unwrap();
        assert_eq!(decoded.message, "no newline");
    }

    #[test]
    fn malformed_header_is_rejected() {
        let bad = b"tree a\nbogus b\n\n\n";
        let err = Commit::parse(bad).unwrap_err();
        assert!(matches!(err, Error::MalformedCommit(_)));
    }
}
