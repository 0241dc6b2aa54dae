//! Eight-byte padding for arbitrary POD types
//!
//! Collections only accept keys and values whose size is a multiple of
//! eight. [`EightPadded`] lets any small POD type be stored anyway: it is
//! laid out as the value followed by zero bytes up to the next multiple of
//! eight.
//!
//! Writes never go through an `EightPadded` value directly. They go through
//! a [`PaddedBuf`], a word-aligned staging buffer that is zero-filled before
//! the values are copied in, so the trailing bytes that reach the store are
//! always zero.

use bytemuck::{AnyBitPattern, Pod, Zeroable};
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::Deref;

use crate::error::ViewError;
use crate::layout::is_paddable;
use crate::view::AlignedView;

/// `T` zero-extended to the next multiple of eight bytes.
///
/// `T` sits at offset zero. Reading values back out of the store is done
/// through `&EightPadded<T>` references into mapped memory; use
/// [`EightPadded::get`] (or deref) to reach the value.
#[repr(C, align(8))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EightPadded<T> {
    value: T,
}

// SAFETY: the only field is `T`, which is valid for any bit pattern, and
// `repr(C)` puts it at offset zero. The trailing padding carries no value.
unsafe impl<T: AnyBitPattern> Zeroable for EightPadded<T> {}
unsafe impl<T: AnyBitPattern> AnyBitPattern for EightPadded<T> {}

impl<T: Pod> EightPadded<T> {
    /// Footprint in the store.
    pub const SIZE: usize = size_of::<Self>();

    /// Number of trailing zero bytes after the value.
    pub const PADDING: usize = size_of::<Self>() - size_of::<T>();

    /// Rejects `T` that cannot be padded into the store layout.
    ///
    /// LMDB only guarantees eight byte alignment for stored values, so a
    /// `T` aligned to more than eight bytes (a `u128` on some targets, or a
    /// `#[repr(align(16))]` struct) would come back misaligned from the
    /// store and is refused when the collection is built rather than on
    /// every read.
    pub const LAYOUT_CHECK: () = assert!(
        is_paddable::<T>(),
        "EightPadded needs a non-empty value type aligned to at most 8 bytes"
    );

    pub fn new(value: T) -> Self {
        let () = Self::LAYOUT_CHECK;
        let mut padded = Self::zeroed();
        padded.value = value;
        padded
    }

    /// The zero-padded byte image of a single value.
    pub fn encode(value: &T) -> PaddedBuf<T> {
        PaddedBuf::from_values(std::slice::from_ref(value))
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Pod> From<T> for EightPadded<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for EightPadded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Word-aligned staging buffer holding values in the padded layout.
pub struct PaddedBuf<T> {
    words: Vec<u64>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> PaddedBuf<T> {
    pub fn from_values(values: &[T]) -> Self {
        let () = EightPadded::<T>::LAYOUT_CHECK;
        let stride = EightPadded::<T>::SIZE;
        let mut words = vec![0u64; values.len() * stride / size_of::<u64>()];

        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut words);
        for (slot, value) in bytes.chunks_exact_mut(stride).zip(values) {
            slot[..size_of::<T>()].copy_from_slice(bytemuck::bytes_of(value));
        }

        Self {
            words,
            len: values.len(),
            _marker: PhantomData,
        }
    }

    /// Number of padded values in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    pub fn view(&self) -> Result<AlignedView<'_, EightPadded<T>>, ViewError> {
        AlignedView::from_bytes(self.as_bytes())
    }
}

impl<'a, T: AnyBitPattern> AlignedView<'a, EightPadded<T>> {
    /// Iterate the values with the padding stripped.
    pub fn unwrapped(&self) -> impl Iterator<Item = &'a T> + 'a {
        self.as_slice().iter().map(|padded| &padded.value)
    }

    pub fn to_vec_unwrapped(&self) -> Vec<T> {
        self.unwrapped().copied().collect()
    }
}
