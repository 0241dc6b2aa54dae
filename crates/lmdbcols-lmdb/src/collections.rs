//! Typed collections
//!
//! Four shapes, all stored through a [`RawCollection`]:
//!
//! | type | value | padding |
//! |---|---|---|
//! | [`PodMap`] | one `V` | caller's types must satisfy [`Record`] |
//! | [`PodArrayMap`] | array of `E` | caller's types must satisfy [`Record`] |
//! | [`PaddedPodMap`] | one `V` | keys and values wrapped in [`EightPadded`] |
//! | [`PaddedPodArrayMap`] | array of `E` | keys and elements wrapped in [`EightPadded`] |
//!
//! Reads return references and views into the transaction's mapped memory;
//! nothing is copied. They borrow the transaction, so they cannot be used
//! after it ends.
//!
//! Instantiating an unpadded collection with a type whose size is not a
//! multiple of eight fails the build:
//!
//! ```compile_fail
//! use lmdbcols_lmdb::PodMap;
//!
//! let map = PodMap::<u32, u64>::new("ticks");
//! ```
//!
//! The padded shapes cost up to seven bytes per key and per value. For small
//! collections that rarely matters.

use bytemuck::Pod;
use lmdb::DatabaseFlags;
use lmdbcols_core::{error::Result, AlignedView, EightPadded, PaddedBuf, Record};
use std::marker::PhantomData;

use crate::raw::RawCollection;
use crate::txn::{Txn, WriteTxn};

/// Named collection mapping `K` to a single `V`.
pub struct PodMap<K, V> {
    raw: RawCollection,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K: Record, V: Record> PodMap<K, V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_flags(name, DatabaseFlags::empty())
    }

    pub fn with_flags(name: impl Into<String>, flags: DatabaseFlags) -> Self {
        let () = K::LAYOUT_CHECK;
        let () = V::LAYOUT_CHECK;
        Self {
            raw: RawCollection::with_flags(name, flags),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        self.raw.name()
    }

    /// Writes exactly `size_of::<V>()` bytes under `key`.
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &K, value: &V) -> Result<()> {
        self.raw
            .put(txn, bytemuck::bytes_of(key), bytemuck::bytes_of(value))
    }

    /// Reference to the stored value, read in place.
    pub fn get<'t, T: Txn>(&self, txn: &'t T, key: &K) -> Result<&'t V> {
        Ok(self.raw.get(txn, bytemuck::bytes_of(key))?.cast::<V>()?)
    }

    pub fn try_get<'t, T: Txn>(&self, txn: &'t T, key: &K) -> Result<Option<&'t V>> {
        match self.raw.try_get(txn, bytemuck::bytes_of(key))? {
            Some(view) => Ok(Some(view.cast::<V>()?)),
            None => Ok(None),
        }
    }

    pub fn exists<T: Txn>(&self, txn: &T, key: &K) -> Result<bool> {
        self.raw.exists(txn, bytemuck::bytes_of(key))
    }
}

/// Named collection mapping `K` to an array of `E`.
pub struct PodArrayMap<K, E> {
    raw: RawCollection,
    _marker: PhantomData<fn() -> (K, E)>,
}

impl<K: Record, E: Record> PodArrayMap<K, E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_flags(name, DatabaseFlags::empty())
    }

    pub fn with_flags(name: impl Into<String>, flags: DatabaseFlags) -> Self {
        let () = K::LAYOUT_CHECK;
        let () = E::LAYOUT_CHECK;
        Self {
            raw: RawCollection::with_flags(name, flags),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        self.raw.name()
    }

    /// Writes `elems` contiguously as one value.
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &K, elems: &[E]) -> Result<()> {
        self.raw.put_array(txn, bytemuck::bytes_of(key), elems)
    }

    pub fn get<'t, T: Txn>(&self, txn: &'t T, key: &K) -> Result<AlignedView<'t, E>> {
        Ok(self.raw.get(txn, bytemuck::bytes_of(key))?.cast_slice::<E>()?)
    }

    pub fn try_get<'t, T: Txn>(&self, txn: &'t T, key: &K) -> Result<Option<AlignedView<'t, E>>> {
        match self.raw.try_get(txn, bytemuck::bytes_of(key))? {
            Some(view) => Ok(Some(view.cast_slice::<E>()?)),
            None => Ok(None),
        }
    }

    pub fn exists<T: Txn>(&self, txn: &T, key: &K) -> Result<bool> {
        self.raw.exists(txn, bytemuck::bytes_of(key))
    }
}

/// Like [`PodMap`], for any POD key and value: both are stored wrapped in
/// [`EightPadded`] and unwrapped again on reads.
pub struct PaddedPodMap<K, V> {
    raw: RawCollection,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K: Pod, V: Pod> PaddedPodMap<K, V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_flags(name, DatabaseFlags::empty())
    }

    pub fn with_flags(name: impl Into<String>, flags: DatabaseFlags) -> Self {
        let () = EightPadded::<K>::LAYOUT_CHECK;
        let () = EightPadded::<V>::LAYOUT_CHECK;
        Self {
            raw: RawCollection::with_flags(name, flags),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        self.raw.name()
    }

    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &K, value: &V) -> Result<()> {
        let key = EightPadded::encode(key);
        let value = EightPadded::encode(value);
        self.raw.put(txn, key.as_bytes(), value.as_bytes())
    }

    /// Reference to the unwrapped value, read in place.
    pub fn get<'t, T: Txn>(&self, txn: &'t T, key: &K) -> Result<&'t V> {
        let key = EightPadded::encode(key);
        let padded = self.raw.get(txn, key.as_bytes())?.cast::<EightPadded<V>>()?;
        Ok(padded.get())
    }

    pub fn try_get<'t, T: Txn>(&self, txn: &'t T, key: &K) -> Result<Option<&'t V>> {
        let key = EightPadded::encode(key);
        match self.raw.try_get(txn, key.as_bytes())? {
            Some(view) => Ok(Some(view.cast::<EightPadded<V>>()?.get())),
            None => Ok(None),
        }
    }

    pub fn exists<T: Txn>(&self, txn: &T, key: &K) -> Result<bool> {
        self.raw.exists(txn, EightPadded::encode(key).as_bytes())
    }
}

/// Like [`PodArrayMap`], for any POD key and element type.
///
/// Reads return the padded elements; use
/// [`AlignedView::unwrapped`] or deref each element to reach the values.
pub struct PaddedPodArrayMap<K, E> {
    raw: RawCollection,
    _marker: PhantomData<fn() -> (K, E)>,
}

impl<K: Pod, E: Pod> PaddedPodArrayMap<K, E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_flags(name, DatabaseFlags::empty())
    }

    pub fn with_flags(name: impl Into<String>, flags: DatabaseFlags) -> Self {
        let () = EightPadded::<K>::LAYOUT_CHECK;
        let () = EightPadded::<E>::LAYOUT_CHECK;
        Self {
            raw: RawCollection::with_flags(name, flags),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        self.raw.name()
    }

    /// Pads every element into a staging buffer, then writes the buffer as
    /// one value.
    pub fn put(&self, txn: &mut WriteTxn<'_>, key: &K, elems: &[E]) -> Result<()> {
        let key = EightPadded::encode(key);
        let staged = PaddedBuf::from_values(elems);
        self.raw.put(txn, key.as_bytes(), staged.as_bytes())
    }

    pub fn get<'t, T: Txn>(
        &self,
        txn: &'t T,
        key: &K,
    ) -> Result<AlignedView<'t, EightPadded<E>>> {
        let key = EightPadded::encode(key);
        Ok(self.raw.get(txn, key.as_bytes())?.cast_slice()?)
    }

    pub fn try_get<'t, T: Txn>(
        &self,
        txn: &'t T,
        key: &K,
    ) -> Result<Option<AlignedView<'t, EightPadded<E>>>> {
        let key = EightPadded::encode(key);
        match self.raw.try_get(txn, key.as_bytes())? {
            Some(view) => Ok(Some(view.cast_slice()?)),
            None => Ok(None),
        }
    }

    pub fn exists<T: Txn>(&self, txn: &T, key: &K) -> Result<bool> {
        self.raw.exists(txn, EightPadded::encode(key).as_bytes())
    }
}
