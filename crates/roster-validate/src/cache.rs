//! Per-sheet memoization using moka
//!
//! The outcome of the per-sheet checks depends only on the sheet's rows and
//! the kind it was classified as, so it is cached under a Blake3 hash of
//! both. A cache hit returns exactly what a fresh run would compute.

use moka::sync::Cache;
use roster_model::{CellValue, EntityKind, RawRow, ValidationError};
use roster_normalize::MappedSheet;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Blake3 digest of a sheet's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetHash([u8; 32]);

impl SheetHash {
    /// Hash the rows of a sheet classified as `kind`
    #[must_use]
    pub fn compute(kind: EntityKind, rows: &[RawRow]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(kind.default_prefix().as_bytes());
        hasher.update(&(rows.len() as u64).to_le_bytes());
        for row in rows {
            hasher.update(&(row.len() as u64).to_le_bytes());
            for (column, cell) in row.iter() {
                feed_str(&mut hasher, column);
                feed_cell(&mut hasher, cell);
            }
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Raw digest bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for SheetHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

fn feed_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

// Tagged so that e.g. Text("1") and Number(1.0) never collide.
fn feed_cell(hasher: &mut blake3::Hasher, cell: &CellValue) {
    match cell {
        CellValue::Text(s) => {
            hasher.update(&[0]);
            feed_str(hasher, s);
        }
        CellValue::Number(n) => {
            hasher.update(&[1]);
            hasher.update(&n.to_bits().to_le_bytes());
        }
        CellValue::TextList(items) => {
            hasher.update(&[2]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                feed_str(hasher, item);
            }
        }
        CellValue::NumberList(items) => {
            hasher.update(&[3]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for n in items {
                hasher.update(&n.to_bits().to_le_bytes());
            }
        }
        CellValue::Object(map) => {
            hasher.update(&[4]);
            feed_str(hasher, &serde_json::Value::Object(map.clone()).to_string());
        }
        CellValue::Absent => {
            hasher.update(&[5]);
        }
    }
}

/// Everything the per-sheet pass produces
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOutcome {
    /// Structural, range and format errors, without a sheet name
    pub errors: Vec<ValidationError>,
    /// Typed rows
    pub mapped: MappedSheet,
    /// `AttributesJSON` values to write back, by row index
    pub repairs: Vec<(usize, CellValue)>,
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Content-addressed cache of per-sheet outcomes
#[derive(Debug, Clone)]
pub struct SheetCache {
    inner: Cache<SheetHash, Arc<SheetOutcome>>,
}

impl SheetCache {
    /// Create new cache with max capacity (in sheets)
    #[inline]
    #[must_use]
    pub fn new(max_sheets: u64) -> Self {
        Self {
            inner: Cache::new(max_sheets),
        }
    }

    /// Get cached outcome
    #[inline]
    #[must_use]
    pub fn get(&self, hash: &SheetHash) -> Option<Arc<SheetOutcome>> {
        self.inner.get(hash)
    }

    /// Get or compute outcome
    pub fn get_or_insert_with<F>(&self, hash: SheetHash, f: F) -> Arc<SheetOutcome>
    where
        F: FnOnce() -> SheetOutcome,
    {
        self.inner.get_with(hash, || Arc::new(f()))
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}
