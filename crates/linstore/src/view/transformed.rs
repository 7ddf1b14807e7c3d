//! Type-transforming projection view.

use std::marker::PhantomData;

use crate::element::Value;
use crate::error::StoreError;
use crate::source::DataSource;

/// Exposes a source of element type `U` as element type `W` through a pair
/// of bidirectional conversion closures.
///
/// This lets one physical store serve logically different element types:
/// `get` converts `U -> W`, `set` converts `W -> U`. Scratch `U` values
/// come from `U::zero()`; no storage is allocated.
///
/// # Examples
///
/// ```
/// use linstore::{DataSource, GenericStore, Transformed};
///
/// // An i64 store viewed as f64.
/// let cents = GenericStore::<i64>::from_vec(vec![150, 275]);
/// let mut dollars = Transformed::new(
///     cents,
///     |w: &f64| (*w * 100.0) as i64,
///     |u: &i64| *u as f64 / 100.0,
/// );
/// assert_eq!(dollars.get_value(1).unwrap(), 2.75);
/// dollars.set(0, &3.5).unwrap();
/// assert_eq!(dollars.into_inner().get_value(0).unwrap(), 350);
/// ```
pub struct Transformed<W, U, S, F, G>
where
    W: Value,
    U: Value,
    S: DataSource<U>,
    F: Fn(&W) -> U + Clone,
    G: Fn(&U) -> W + Clone,
{
    source: S,
    to_inner: F,
    from_inner: G,
    _marker: PhantomData<(W, U)>,
}

impl<W, U, S, F, G> Transformed<W, U, S, F, G>
where
    W: Value,
    U: Value,
    S: DataSource<U>,
    F: Fn(&W) -> U + Clone,
    G: Fn(&U) -> W + Clone,
{
    /// Wrap `source`, converting writes with `to_inner` and reads with
    /// `from_inner`.
    pub fn new(source: S, to_inner: F, from_inner: G) -> Self {
        Self {
            source,
            to_inner,
            from_inner,
            _marker: PhantomData,
        }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<W, U, S, F, G> DataSource<W> for Transformed<W, U, S, F, G>
where
    W: Value,
    U: Value,
    S: DataSource<U>,
    F: Fn(&W) -> U + Clone,
    G: Fn(&U) -> W + Clone,
{
    fn size(&self) -> u64 {
        self.source.size()
    }

    fn get(&self, index: u64, out: &mut W) -> Result<(), StoreError> {
        let mut scratch = U::zero();
        self.source.get(index, &mut scratch)?;
        *out = (self.from_inner)(&scratch);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &W) -> Result<(), StoreError> {
        let inner = (self.to_inner)(value);
        self.source.set(index, &inner)
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(Self {
            source: self.source.duplicate()?,
            to_inner: self.to_inner.clone(),
            from_inner: self.from_inner.clone(),
            _marker: PhantomData,
        })
    }
}

impl<W, U, S, F, G> std::fmt::Debug for Transformed<W, U, S, F, G>
where
    W: Value,
    U: Value,
    S: DataSource<U>,
    F: Fn(&W) -> U + Clone,
    G: Fn(&U) -> W + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformed").field("source", &self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GenericStore;

    #[test]
    fn test_widening_projection() {
        let store = GenericStore::<i32>::from_vec(vec![1, 2, 3]);
        let view = Transformed::new(store, |w: &i64| *w as i32, |u: &i32| *u as i64);
        assert_eq!(view.size(), 3);
        assert_eq!(view.get_value(2).unwrap(), 3i64);
    }

    #[test]
    fn test_set_converts_back() {
        let store = GenericStore::<i32>::from_vec(vec![0, 0]);
        let mut view = Transformed::new(store, |w: &i64| *w as i32, |u: &i32| *u as i64);
        view.set(1, &41i64).unwrap();
        assert_eq!(view.get_value(1).unwrap(), 41i64);
        assert_eq!(view.into_inner().get_value(1).unwrap(), 41i32);
    }

    #[test]
    fn test_errors_propagate() {
        let store = GenericStore::<i32>::new(2);
        let view = Transformed::new(store, |w: &i64| *w as i32, |u: &i32| *u as i64);
        assert!(view.get_value(2).is_err());
    }
}
