//! Zero-padding view.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::DataSource;

/// Presents its source as if it extended indefinitely with zeros.
///
/// Reads inside `[0, size)` delegate; reads beyond return zero instead of
/// an error. Writes beyond the extent succeed only for a zero value — a
/// non-zero value cannot be materialized outside the declared extent and
/// fails with [`StoreError::InvalidBoundaryWrite`].
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, GenericStore, Padded};
///
/// let mut padded = Padded::new(GenericStore::<f64>::from_vec(vec![1.0, 2.0]));
/// assert_eq!(padded.get_value(1).unwrap(), 2.0);
/// assert_eq!(padded.get_value(1_000_000).unwrap(), 0.0);
/// assert!(padded.set(5, &0.0).is_ok());
/// assert!(padded.set(5, &3.0).is_err());
/// ```
#[derive(Debug)]
pub struct Padded<T: Value, S: DataSource<T>> {
    source: S,
    _marker: PhantomData<T>,
}

impl<T: Value, S: DataSource<T>> Padded<T, S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            _marker: PhantomData,
        }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<T: Value, S: DataSource<T>> DataSource<T> for Padded<T, S> {
    fn size(&self) -> u64 {
        self.source.size()
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        if index < self.source.size() {
            self.source.get(index, out)
        } else {
            *out = T::zero();
            Ok(())
        }
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        let size = self.source.size();
        if index < size {
            self.source.set(index, value)
        } else if value.is_zero() {
            Ok(())
        } else {
            Err(StoreError::InvalidBoundaryWrite { index, size })
        }
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(Self::new(self.source.duplicate()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GenericStore;

    #[test]
    fn test_in_range_delegates() {
        let mut padded = Padded::new(GenericStore::<i32>::new(3));
        padded.set(2, &5).unwrap();
        assert_eq!(padded.get_value(2).unwrap(), 5);
        assert_eq!(padded.size(), 3);
    }

    #[test]
    fn test_out_of_range_reads_zero() {
        let padded = Padded::new(GenericStore::<i32>::new(3));
        assert_eq!(padded.get_value(3).unwrap(), 0);
        assert_eq!(padded.get_value(u64::MAX - 1).unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_zero_write_is_noop() {
        let mut padded = Padded::new(GenericStore::<i32>::new(3));
        assert!(padded.set(10, &0).is_ok());
    }

    #[test]
    fn test_out_of_range_nonzero_write_fails() {
        let mut padded = Padded::new(GenericStore::<i32>::new(3));
        assert!(matches!(
            padded.set(10, &7),
            Err(StoreError::InvalidBoundaryWrite { index: 10, size: 3 })
        ));
    }
}
