//! Boolean-pattern masking view.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};

/// Exposes only the positions selected by a boolean pattern applied
/// cyclically over the source.
///
/// For pattern length `m` with `t` true bits over a source of length `n`,
/// `size()` is `(n / m) * t` plus the true bits in the partial trailing
/// cycle. Resolving an exposed ordinal to an underlying index walks the
/// pattern, so each access costs O(m); masks are expected to be short and
/// reused.
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, GenericStore, Masked};
///
/// let data = GenericStore::<i32>::from_vec((0..8).collect());
/// let masked = Masked::new(data, vec![true, false, true]).unwrap();
/// // Selected underlying indices: 0, 2, 3, 5, 6
/// assert_eq!(masked.size(), 5);
/// assert_eq!(masked.get_value(2).unwrap(), 3);
/// assert_eq!(masked.get_value(4).unwrap(), 6);
/// ```
pub struct Masked<T: Value, S: DataSource<T>> {
    source: S,
    pattern: Vec<bool>,
    trues_per_cycle: u64,
    size: u64,
    _marker: PhantomData<T>,
}

impl<T: Value, S: DataSource<T>> Masked<T, S> {
    /// Wrap `source` with a cyclic boolean `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] for an empty pattern.
    pub fn new(source: S, pattern: Vec<bool>) -> Result<Self, StoreError> {
        if pattern.is_empty() {
            return Err(StoreError::configuration("mask pattern must not be empty"));
        }
        let m = pattern.len() as u64;
        let trues_per_cycle = pattern.iter().filter(|&&on| on).count() as u64;
        let n = source.size();
        let trailing = pattern[..(n % m) as usize]
            .iter()
            .filter(|&&on| on)
            .count() as u64;
        let size = (n / m) * trues_per_cycle + trailing;
        Ok(Self {
            source,
            pattern,
            trues_per_cycle,
            size,
            _marker: PhantomData,
        })
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Underlying index of exposed ordinal `index` (must be `< size`).
    fn resolve(&self, index: u64) -> u64 {
        let cycle = index / self.trues_per_cycle;
        let within = index % self.trues_per_cycle;
        let mut seen = 0u64;
        for (position, &on) in self.pattern.iter().enumerate() {
            if on {
                if seen == within {
                    return cycle * self.pattern.len() as u64 + position as u64;
                }
                seen += 1;
            }
        }
        unreachable!("ordinal within bounds resolves inside one pattern cycle")
    }
}

impl<T: Value, S: DataSource<T>> DataSource<T> for Masked<T, S> {
    fn size(&self) -> u64 {
        self.size
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        self.source.get(self.resolve(index), out)
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        let underlying = self.resolve(index);
        self.source.set(underlying, value)
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(Self {
            source: self.source.duplicate()?,
            pattern: self.pattern.clone(),
            trues_per_cycle: self.trues_per_cycle,
            size: self.size,
            _marker: PhantomData,
        })
    }
}

impl<T: Value, S: DataSource<T>> std::fmt::Debug for Masked<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Masked")
            .field("pattern", &self.pattern)
            .field("size", &self.size)
            .finish()
    }
}
