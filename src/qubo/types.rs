//! Dense QUBO instance.

use crate::error::{Error, Result};
use crate::selection::Selection;

/// A dense `n × n` QUBO matrix with a constant offset.
///
/// The matrix is stored row-major and never mutated once constructed, so a
/// single instance can be shared read-only between engines.
#[derive(Debug, Clone, PartialEq)]
pub struct QuboInstance {
    n: usize,
    q: Vec<f64>,
    offset: f64,
}

impl QuboInstance {
    /// Wraps a row-major matrix of `n * n` entries.
    pub fn new(n: usize, q: Vec<f64>, offset: f64) -> Result<Self> {
        Error::ensure_len("QUBO matrix entries", n * n, q.len())?;
        Ok(Self { n, q, offset })
    }

    /// Builds an instance from nested rows, rejecting non-square input.
    pub fn from_rows(rows: Vec<Vec<f64>>, offset: f64) -> Result<Self> {
        let n = rows.len();
        let mut q = Vec::with_capacity(n * n);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != n {
                return Err(Error::NotSquare {
                    row,
                    len: entries.len(),
                    expected: n,
                });
            }
            q.extend(entries);
        }
        Ok(Self { n, q, offset })
    }

    /// All-zero instance of dimension `n`.
    pub(crate) fn zeros(n: usize, offset: f64) -> Self {
        Self {
            n,
            q: vec![0.0; n * n],
            offset,
        }
    }

    /// Dimension `n`.
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.q[i * self.n + j]
    }

    #[inline]
    pub(crate) fn add(&mut self, i: usize, j: usize, value: f64) {
        self.q[i * self.n + j] += value;
    }

    pub(crate) fn add_offset(&mut self, value: f64) {
        self.offset += value;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.q[i * self.n..(i + 1) * self.n]
    }

    /// Row-major entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.q
    }

    /// Nested-row copy of the matrix.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }

    /// Whether `|Q[i][j] − Q[j][i]| <= tol` for all pairs.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.n).all(|i| ((i + 1)..self.n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol))
    }

    /// Fails unless `selection` has exactly `n` entries.
    pub fn check_selection(&self, selection: &Selection) -> Result<()> {
        Error::ensure_len("selection", self.n, selection.len())
    }

    /// Fails unless a per-site vector (costs, catalog rows, ...) has `n` entries.
    pub fn check_aligned(&self, what: &'static str, len: usize) -> Result<()> {
        Error::ensure_len(what, self.n, len)
    }

    /// Energy `x·Q·x`, without the offset.
    pub fn energy(&self, x: &Selection) -> f64 {
        debug_assert_eq!(x.len(), self.n);
        let mut e = 0.0;
        for i in x.iter_selected() {
            let row = self.row(i);
            for j in x.iter_selected() {
                e += row[j];
            }
        }
        e
    }

    /// Penalized objective `x·Q·x + offset`.
    pub fn objective(&self, x: &Selection) -> f64 {
        self.energy(x) + self.offset
    }

    /// Energy change caused by flipping bit `k` of `x`, in O(n).
    ///
    /// Uses both row and column `k`, so it is exact for non-symmetric
    /// matrices too.
    pub fn flip_delta(&self, x: &Selection, k: usize) -> f64 {
        debug_assert_eq!(x.len(), self.n);
        let row = self.row(k);
        let mut coupling = 0.0;
        for j in x.iter_selected() {
            if j != k {
                coupling += row[j] + self.get(j, k);
            }
        }
        let gain = row[k] + coupling;
        if x.is_selected(k) {
            -gain
        } else {
            gain
        }
    }
}
