//! Binary selection vectors.

use std::fmt;

/// A binary selection vector `x ∈ {0,1}^n`.
///
/// Entry `i` refers to catalog row `i` and to row/column `i` of every QUBO
/// matrix built from that catalog. `true` means the site is selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    bits: Vec<bool>,
}

impl Selection {
    /// All-zero selection of length `n`.
    pub fn empty(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    /// Builds a selection of length `n` with the given indices set.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= n`. Use
    /// [`Selection::from_indices_checked`] for untrusted input.
    pub fn from_indices(n: usize, indices: &[usize]) -> Self {
        let mut bits = vec![false; n];
        for &i in indices {
            assert!(i < n, "selected index {i} out of range for {n} sites");
            bits[i] = true;
        }
        Self { bits }
    }

    /// Like [`Selection::from_indices`] but fails on out-of-range indices.
    pub fn from_indices_checked(n: usize, indices: &[usize]) -> crate::Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(crate::Error::DimensionMismatch {
                what: "selected index",
                expected: n,
                found: bad,
            });
        }
        Ok(Self::from_indices(n, indices))
    }

    /// Random selection where each bit is set with probability 1/2.
    pub fn random<R: rand::Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..n).map(|_| rng.random_bool(0.5)).collect(),
        }
    }

    /// Number of entries (the catalog size `n`).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether site `i` is selected.
    #[inline]
    pub fn is_selected(&self, i: usize) -> bool {
        self.bits[i]
    }

    /// Flips entry `i`.
    #[inline]
    pub fn flip(&mut self, i: usize) {
        self.bits[i] = !self.bits[i];
    }

    pub fn set(&mut self, i: usize, value: bool) {
        self.bits[i] = value;
    }

    /// Number of selected sites.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.iter_selected().collect()
    }

    /// Iterates over selected indices in ascending order.
    pub fn iter_selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// The vector as `0`/`1` integers.
    pub fn to_binary(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b)).collect()
    }
}

impl From<Vec<bool>> for Selection {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_indices() {
        let s = Selection::from_indices(5, &[0, 3]);
        assert_eq!(s.selected_indices(), vec![0, 3]);
        assert_eq!(s.count(), 2);
        assert_eq!(s.to_string(), "10010");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_from_indices_panics_out_of_range() {
        let _ = Selection::from_indices(5, &[0, 9]);
    }

    #[test]
    fn test_from_indices_checked_rejects_out_of_range() {
        assert!(Selection::from_indices_checked(3, &[0, 2]).is_ok());
        assert!(Selection::from_indices_checked(3, &[3]).is_err());
    }

    #[test]
    fn test_flip() {
        let mut s = Selection::empty(3);
        s.flip(1);
        assert!(s.is_selected(1));
        s.flip(1);
        assert_eq!(s, Selection::empty(3));
    }

    #[test]
    fn test_to_binary() {
        let s = Selection::from(vec![true, false, true]);
        assert_eq!(s.to_binary(), vec![1, 0, 1]);
    }
}
