//! Dense, fully materialized in-memory backing.

use crate::element::{Element, Value};
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};

/// Dense storage: one contiguous primitive buffer of whole encoded slots.
///
/// Layout is `size * COMPONENTS` primitives, slot `i` occupying
/// `[i * COMPONENTS, (i + 1) * COMPONENTS)`.
///
/// # Examples
///
/// ```
/// use linstore::{ArrayStore, DataSource};
///
/// let mut store: ArrayStore<f64> = ArrayStore::try_new(8).unwrap();
/// store.set(3, &2.5).unwrap();
/// assert_eq!(store.get_value(3).unwrap(), 2.5);
/// assert_eq!(store.size(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct ArrayStore<E: Element> {
    size: u64,
    data: Vec<E::Primitive>,
}

impl<E: Element> ArrayStore<E> {
    /// Create a zero-filled store of `size` elements.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the slot geometry overflows
    /// the address space, and [`StoreError::AllocationFailed`] if the buffer
    /// cannot be reserved. The factory keys its file-backed fallback on the
    /// latter.
    pub fn try_new(size: u64) -> Result<Self, StoreError> {
        let total = slot_total::<E>(size)?;
        let mut data: Vec<E::Primitive> = Vec::new();
        data.try_reserve_exact(total)?;
        data.resize(total, <E::Primitive as Value>::zero());
        Ok(Self { size, data })
    }

    #[inline]
    fn slot_range(index: u64) -> std::ops::Range<usize> {
        let start = index as usize * E::COMPONENTS;
        start..start + E::COMPONENTS
    }
}

/// Total primitive count for `size` slots, rejecting address-space overflow.
pub(crate) fn slot_total<E: Element>(size: u64) -> Result<usize, StoreError> {
    size.checked_mul(E::COMPONENTS as u64)
        .and_then(|total| usize::try_from(total).ok())
        .ok_or_else(|| {
            StoreError::configuration(format!(
                "slot geometry overflow: {size} elements of {} components",
                E::COMPONENTS
            ))
        })
}

impl<E: Element> DataSource<E> for ArrayStore<E> {
    fn size(&self) -> u64 {
        self.size
    }

    fn get(&self, index: u64, out: &mut E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        out.decode(&self.data[Self::slot_range(index)]);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        value.encode(&mut self.data[Self::slot_range(index)]);
        Ok(())
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        Ok(self.clone())
    }
}
