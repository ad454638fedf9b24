//! Stable hashing helpers (schema fingerprints).

use blake3::Hasher;

use crate::schema::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }

    /// First 8 bytes in hex; enough to tell schemas apart in a log line.
    pub fn short(&self) -> String {
        self.to_hex()[..16].to_string()
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Digest over each column's type tag and length-prefixed name.
pub fn hash_columns(columns: &[Column]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(&(columns.len() as u64).to_le_bytes());
    for col in columns {
        h.update(&[col.column_type.tag()]);
        h.update(&(col.name.len() as u64).to_le_bytes());
        h.update(col.name.as_bytes());
    }
    Hash256(h.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        let h = hash_columns(&[Column::i64("size")]);
        assert_eq!(h.to_hex().len(), 64);
        assert_eq!(h.short().len(), 16);
        assert!(h.to_hex().starts_with(&h.short()));
        assert_eq!(h.to_string(), h.to_hex());
    }

    #[test]
    fn name_boundaries_matter() {
        let ab_c = [Column::string("ab"), Column::string("c")];
        let a_bc = [Column::string("a"), Column::string("bc")];
        assert_ne!(hash_columns(&ab_c), hash_columns(&a_bc));
    }
}
