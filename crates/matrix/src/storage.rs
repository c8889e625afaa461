//! Storage representations a [`Matrix`](crate::Matrix) can be held in.

use std::fmt;
use std::str::FromStr;

use crate::error::MatrixError;

/// The two recognized storage representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Full n x n array.
    Dense,
    /// Compressed sparse row storage holding only nonzero entries.
    Sparse,
}

impl StorageKind {
    /// Returns the lowercase name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Sparse => "sparse",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = MatrixError;

    /// Parses `dense` or `sparse` (case-insensitive, also `csr` for sparse).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dense" => Ok(Self::Dense),
            "sparse" | "csr" => Ok(Self::Sparse),
            _ => Err(MatrixError::UnsupportedStorage {
                kind: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!("dense".parse::<StorageKind>(), Ok(StorageKind::Dense));
        assert_eq!("Sparse".parse::<StorageKind>(), Ok(StorageKind::Sparse));
        assert_eq!(" csr ".parse::<StorageKind>(), Ok(StorageKind::Sparse));
    }

    #[test]
    fn parse_unknown_kind() {
        let err = "coo".parse::<StorageKind>().unwrap_err();
        assert!(matches!(err, MatrixError::UnsupportedStorage { kind } if kind == "coo"));
    }

    #[test]
    fn display_matches_parse() {
        for kind in [StorageKind::Dense, StorageKind::Sparse] {
            assert_eq!(kind.to_string().parse::<StorageKind>(), Ok(kind));
        }
    }
}
