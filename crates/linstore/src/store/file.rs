//! Out-of-core backing for datasets too large for memory.

use std::fmt;

use memmap2::MmapMut;
use smallvec::{smallvec, SmallVec};

use crate::element::{Element, FixedPrimitive, Value};
use crate::error::StoreError;
use crate::source::{check_bounds, DataSource};
use crate::store::array::slot_total;

/// File-backed storage with the identical contract as
/// [`ArrayStore`](crate::ArrayStore).
///
/// Slots are fixed-width little-endian records in an anonymous temp file,
/// memory-mapped for random access; a fresh file reads as all zeros. Reads
/// and writes are blocking, with no timeout or cancellation.
///
/// The file is unlinked from birth (`tempfile::tempfile`), so the medium is
/// reclaimed on drop with no cleanup path.
pub struct FileStore<E: Element>
where
    E::Primitive: FixedPrimitive,
{
    size: u64,
    map: MmapMut,
    _marker: std::marker::PhantomData<E>,
}

impl<E: Element> FileStore<E>
where
    E::Primitive: FixedPrimitive,
{
    /// Create a zero-filled file-backed store of `size` elements.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] on record-geometry overflow and
    /// [`StoreError::Backing`] if the temp file cannot be created, sized, or
    /// mapped.
    pub fn try_new(size: u64) -> Result<Self, StoreError> {
        let bytes = slot_total::<E>(size)?
            .checked_mul(<E::Primitive as FixedPrimitive>::WIDTH)
            .ok_or_else(|| {
                StoreError::configuration(format!("record geometry overflow: {size} elements"))
            })?;

        let file = tempfile::tempfile()?;
        // A zero-length mapping is rejected on every platform; a 0-element
        // store maps one byte it never touches.
        file.set_len(bytes.max(1) as u64)?;
        let map = unsafe { MmapMut::map_mut(&file)? };
        tracing::debug!(size, bytes, "created file-backed store");

        Ok(Self {
            size,
            map,
            _marker: std::marker::PhantomData,
        })
    }

    #[inline]
    fn slot_bytes() -> usize {
        E::COMPONENTS * <E::Primitive as FixedPrimitive>::WIDTH
    }

    #[inline]
    fn byte_offset(index: u64) -> usize {
        index as usize * Self::slot_bytes()
    }
}

impl<E: Element> DataSource<E> for FileStore<E>
where
    E::Primitive: FixedPrimitive,
{
    fn size(&self) -> u64 {
        self.size
    }

    fn get(&self, index: u64, out: &mut E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        let width = <E::Primitive as FixedPrimitive>::WIDTH;
        let offset = Self::byte_offset(index);
        let mut slot: SmallVec<[E::Primitive; 4]> =
            smallvec![<E::Primitive as Value>::zero(); E::COMPONENTS];
        for (component, part) in slot.iter_mut().enumerate() {
            let at = offset + component * width;
            *part = <E::Primitive as FixedPrimitive>::read_le(&self.map[at..at + width]);
        }
        out.decode(&slot);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &E) -> Result<(), StoreError> {
        check_bounds(index, self.size)?;
        let width = <E::Primitive as FixedPrimitive>::WIDTH;
        let offset = Self::byte_offset(index);
        let mut slot: SmallVec<[E::Primitive; 4]> =
            smallvec![<E::Primitive as Value>::zero(); E::COMPONENTS];
        value.encode(&mut slot);
        for (component, part) in slot.iter().enumerate() {
            let at = offset + component * width;
            part.write_le(&mut self.map[at..at + width]);
        }
        Ok(())
    }

    fn duplicate(&self) -> Result<Self, StoreError> {
        let mut copy = Self::try_new(self.size)?;
        copy.map.copy_from_slice(&self.map);
        Ok(copy)
    }
}

impl<E: Element> fmt::Debug for FileStore<E>
where
    E::Primitive: FixedPrimitive,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("size", &self.size)
            .field("slot_bytes", &Self::slot_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let store: FileStore<f64> = FileStore::try_new(16).unwrap();
        for i in 0..16 {
            assert_eq!(store.get_value(i).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut store: FileStore<i16> = FileStore::try_new(10).unwrap();
        store.set(0, &-123).unwrap();
        store.set(9, &456).unwrap();
        assert_eq!(store.get_value(0).unwrap(), -123);
        assert_eq!(store.get_value(9).unwrap(), 456);
        assert_eq!(store.get_value(5).unwrap(), 0);
    }

    #[test]
    fn test_bool_backing() {
        let mut store: FileStore<bool> = FileStore::try_new(3).unwrap();
        store.set(1, &true).unwrap();
        assert!(!store.get_value(0).unwrap());
        assert!(store.get_value(1).unwrap());
    }

    #[test]
    fn test_bounds_checked() {
        let store: FileStore<f64> = FileStore::try_new(4).unwrap();
        assert!(store.get_value(4).is_err());
    }

    #[test]
    fn test_empty_store() {
        let store: FileStore<f64> = FileStore::try_new(0).unwrap();
        assert_eq!(store.size(), 0);
        assert!(store.get_value(0).is_err());
    }

    #[test]
    fn test_duplicate_is_deep() {
        let mut a: FileStore<f64> = FileStore::try_new(4).unwrap();
        a.set(2, &7.5).unwrap();
        let mut b = a.duplicate().unwrap();
        assert_eq!(b.get_value(2).unwrap(), 7.5);
        b.set(2, &-1.0).unwrap();
        assert_eq!(a.get_value(2).unwrap(), 7.5);
    }
}
