//! Concatenation view over two sources.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};

/// Two sources presented as one contiguous sequence.
///
/// Indices below the first source's size read from it; the rest read from
/// the second source at `index - first.size()`. The combined size may not
/// exceed `i64::MAX`, checked at construction.
///
/// # Examples
///
/// ```
/// use linstore::{Concatenated, DataSource, GenericStore};
///
/// let a = GenericStore::<i32>::from_vec(vec![1, 2]);
/// let b = GenericStore::<i32>::from_vec(vec![3]);
/// let joined = Concatenated::new(a, b).unwrap();
/// assert_eq!(joined.size(), 3);
/// assert_eq!(joined.get_value(2).unwrap(), 3);
/// ```
#[derive(Debug)]
pub struct Concatenated<T: Value, A: DataSource<T>, B: DataSource<T>> {
    first: A,
    second: B,
    split: u64,
    size: u64,
    _marker: PhantomData<T>,
}

impl<T: Value, A: DataSource<T>, B: DataSource<T>> Concatenated<T, A, B> {
    /// Join `first` and `second` end to end.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SizeOverflow`] if the summed size exceeds the
    /// maximum representable index.
    pub fn new(first: A, second: B) -> Result<Self, StoreError> {
        let (left, right) = (first.size(), second.size());
        let size = left
            .checked_add(right)
            .filter(|&total| total <= i64::MAX as u64)
            .ok_or(StoreError::SizeOverflow { left, right })?;
        Ok(Self {
            first,
            second,
            split: left,
            size,
            _marker: PhantomData,
        })
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<T: Value, A: DataSource<T>, B: DataSource<T>> DataSource<T> for Concatenated<T, A, B> {
    fn size(&self) -> u64 {
        self.size
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        if index < self.split {
            self.first.get(index, out)
        } else {
            self.second.get(index - self.split, out)
        }
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        if index < self.split {
            self.first.set(index, value)
        } else {
            self.second.set(index - self.split, value)
        }
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(Self {
            first: self.first.duplicate()?,
            second: self.second.duplicate()?,
            split: self.split,
            size: self.size,
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GenericStore;

    #[test]
    fn test_reads_span_both_sources() {
        let a = GenericStore::from_vec(vec![10, 20]);
        let b = GenericStore::from_vec(vec![30, 40, 50]);
        let joined = Concatenated::new(a, b).unwrap();
        assert_eq!(joined.size(), 5);
        let all: Vec<i32> = (0..5).map(|i| joined.get_value(i).unwrap()).collect();
        assert_eq!(all, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_writes_route_to_owner() {
        let a = GenericStore::from_vec(vec![0, 0]);
        let b = GenericStore::from_vec(vec![0]);
        let mut joined = Concatenated::new(a, b).unwrap();
        joined.set(1, &7).unwrap();
        joined.set(2, &8).unwrap();
        let (a, b) = joined.into_inner();
        assert_eq!(a.get_value(1).unwrap(), 7);
        assert_eq!(b.get_value(0).unwrap(), 8);
    }

    #[test]
    fn test_bounds_checked() {
        let a = GenericStore::<i32>::new(2);
        let b = GenericStore::<i32>::new(1);
        let joined = Concatenated::new(a, b).unwrap();
        assert!(joined.get_value(3).is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        use crate::store::SparseStore;
        let a: SparseStore<i32> = SparseStore::new(i64::MAX as u64);
        let b: SparseStore<i32> = SparseStore::new(1);
        assert!(matches!(
            Concatenated::new(a, b),
            Err(StoreError::SizeOverflow { .. })
        ));
    }
}
