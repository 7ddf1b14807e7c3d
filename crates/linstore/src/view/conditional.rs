//! Predicate-filtering view over a point-in-time snapshot.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};

/// Exposes the elements that satisfied a predicate when the view was built.
///
/// Construction scans the source once and records the matching indices; the
/// index list is a snapshot, not a live filter. Later external mutation of
/// the source never resizes the view, but `get`/`set` still delegate live
/// through the recorded indices.
///
/// The invariant "every exposed element satisfies the predicate" is kept on
/// the write side too: `set` rejects a non-satisfying value with
/// [`StoreError::PredicateViolation`].
///
/// # Examples
///
/// ```
/// use linstore::{Conditional, DataSource, GenericStore};
///
/// let data = GenericStore::<i32>::from_vec(vec![-2, 5, 0, 9, -1]);
/// let view = Conditional::new(data, |v: &i32| *v > 0).unwrap();
/// assert_eq!(view.size(), 2);
/// assert_eq!(view.get_value(0).unwrap(), 5);
/// assert_eq!(view.get_value(1).unwrap(), 9);
/// ```
pub struct Conditional<T, S, P>
where
    T: Value,
    S: DataSource<T>,
    P: Fn(&T) -> bool + Clone,
{
    source: S,
    predicate: P,
    indices: Vec<u64>,
    _marker: PhantomData<T>,
}

impl<T, S, P> Conditional<T, S, P>
where
    T: Value,
    S: DataSource<T>,
    P: Fn(&T) -> bool + Clone,
{
    /// Scan `source` and snapshot the indices whose value satisfies
    /// `predicate`.
    pub fn new(source: S, predicate: P) -> Result<Self, StoreError> {
        let mut indices = Vec::new();
        let mut scratch = T::zero();
        for index in 0..source.size() {
            source.get(index, &mut scratch)?;
            if predicate(&scratch) {
                indices.push(index);
            }
        }
        Ok(Self {
            source,
            predicate,
            indices,
            _marker: PhantomData,
        })
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<T, S, P> DataSource<T> for Conditional<T, S, P>
where
    T: Value,
    S: DataSource<T>,
    P: Fn(&T) -> bool + Clone,
{
    fn size(&self) -> u64 {
        self.indices.len() as u64
    }

    fn get(&self, index: u64, out: &mut T) -> Result<(), StoreError> {
        check_bounds(index, self.size())?;
        self.source.get(self.indices[index as usize], out)
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StoreError> {
        check_bounds(index, self.size())?;
        if !(self.predicate)(value) {
            return Err(StoreError::PredicateViolation { index });
        }
        let underlying = self.indices[index as usize];
        self.source.set(underlying, value)
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(Self {
            source: self.source.duplicate()?,
            predicate: self.predicate.clone(),
            indices: self.indices.clone(),
            _marker: PhantomData,
        })
    }
}

impl<T, S, P> std::fmt::Debug for Conditional<T, S, P>
where
    T: Value,
    S: DataSource<T>,
    P: Fn(&T) -> bool + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conditional")
            .field("source", &self.source)
            .field("matches", &self.indices.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GenericStore;

    #[test]
    fn test_snapshot_selects_matches() {
        let data = GenericStore::from_vec(vec![1.0, -2.0, 3.0, -4.0]);
        let view = Conditional::new(data, |v: &f64| *v > 0.0).unwrap();
        assert_eq!(view.size(), 2);
        assert_eq!(view.get_value(0).unwrap(), 1.0);
        assert_eq!(view.get_value(1).unwrap(), 3.0);
    }

    #[test]
    fn test_set_satisfying_value_writes_through() {
        let data = GenericStore::from_vec(vec![1, -2, 3]);
        let mut view = Conditional::new(data, |v: &i32| *v > 0).unwrap();
        view.set(1, &99).unwrap();
        assert_eq!(view.get_value(1).unwrap(), 99);
        assert_eq!(view.into_inner().get_value(2).unwrap(), 99);
    }

    #[test]
    fn test_set_violating_value_rejected() {
        let data = GenericStore::from_vec(vec![1, 2]);
        let mut view = Conditional::new(data, |v: &i32| *v > 0).unwrap();
        assert!(matches!(
            view.set(0, &-5),
            Err(StoreError::PredicateViolation { index: 0 })
        ));
        assert_eq!(view.get_value(0).unwrap(), 1);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let data = GenericStore::from_vec(vec![1, 2, 3]);
        let view = Conditional::new(data, |v: &i32| *v > 100).unwrap();
        assert_eq!(view.size(), 0);
        assert!(view.get_value(0).is_err());
    }
}
