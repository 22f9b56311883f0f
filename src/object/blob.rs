/// An opaque, content-addressed byte sequence. No internal structure — the
/// framed representation's content *is* the blob's bytes, verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    content: Vec<u8>,
}

impl Blob {
    pub fn from_content(content: Vec<u8>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.content.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_is_identity() {
        let b = Blob::from_content(b"abc".to_vec());
        assert_eq!(b.serialize(), b"abc");
    }
}
