//! Zero-copy typed views over byte ranges
//!
//! An [`AlignedView`] borrows a contiguous byte range (usually memory mapped
//! by LMDB for the lifetime of a transaction) and reads it as `[T]` without
//! copying. Every way of building a view from untyped bytes goes through a
//! size and alignment check that returns a [`ViewError`] on mismatch.

use bytemuck::{AnyBitPattern, NoUninit};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ops::{Index, Range};

use crate::error::ViewError;

fn check_alignment(bytes: &[u8], align: usize) -> Result<(), ViewError> {
    let addr = bytes.as_ptr() as usize;
    if addr % align == 0 {
        Ok(())
    } else {
        Err(ViewError::Misaligned { addr, align })
    }
}

/// Immutable, non-owning view of `len` values of `T` stored back to back.
///
/// The null view (see [`AlignedView::null`]) stands for "absent": it has no
/// backing bytes, a null `begin()` and zero length.
pub struct AlignedView<'a, T> {
    bytes: Option<&'a [u8]>,
    len: usize,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T> Clone for AlignedView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for AlignedView<'a, T> {}

impl<'a, T: AnyBitPattern> AlignedView<'a, T> {
    /// Check `bytes` and read them as `[T]`.
    ///
    /// The length must be an exact multiple of `size_of::<T>()` and a
    /// non-empty range must start at an address aligned for `T`.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, ViewError> {
        let size = size_of::<T>();
        if size == 0 || bytes.len() % size != 0 {
            return Err(ViewError::SizeMismatch {
                len: bytes.len(),
                size,
            });
        }
        if !bytes.is_empty() {
            check_alignment(bytes, align_of::<T>())?;
        }
        Ok(Self {
            bytes: Some(bytes),
            len: bytes.len() / size,
            _marker: PhantomData,
        })
    }

    /// Element types must occupy at least one byte.
    const ELEMENT_CHECK: () = assert!(size_of::<T>() != 0, "zero-sized element type");

    /// View an existing typed slice.
    pub fn from_slice(slice: &'a [T]) -> Self
    where
        T: NoUninit,
    {
        let () = Self::ELEMENT_CHECK;
        Self {
            bytes: Some(bytemuck::cast_slice(slice)),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// View `count` values starting at `ptr`.
    ///
    /// A zero-sized `T` is rejected like in [`AlignedView::from_bytes`].
    ///
    /// # Safety
    ///
    /// When `count > 0`, `ptr` must be aligned for `T` and point to
    /// `count * size_of::<T>()` initialized bytes that stay valid and
    /// unmodified for `'a`.
    pub unsafe fn from_raw_parts(ptr: *const T, count: usize) -> Result<Self, ViewError> {
        let size = size_of::<T>();
        if size == 0 {
            return Err(ViewError::SizeMismatch { len: 0, size });
        }
        if count == 0 {
            return Ok(Self::empty());
        }
        debug_assert!(ptr as usize % align_of::<T>() == 0);
        let bytes = std::slice::from_raw_parts(ptr.cast::<u8>(), count * size);
        Ok(Self {
            bytes: Some(bytes),
            len: count,
            _marker: PhantomData,
        })
    }

    /// View the values in `[begin, end)`; `end` is one past the last value.
    ///
    /// # Safety
    ///
    /// Both pointers must come from the same allocation, with `begin <= end`,
    /// and the range must satisfy the requirements of
    /// [`AlignedView::from_raw_parts`].
    pub unsafe fn from_ptr_range(begin: *const T, end: *const T) -> Result<Self, ViewError> {
        if size_of::<T>() == 0 {
            return Err(ViewError::SizeMismatch { len: 0, size: 0 });
        }
        let count = end.offset_from(begin);
        assert!(count >= 0, "view range end precedes begin");
        Self::from_raw_parts(begin, count as usize)
    }

    /// The "absent" view.
    pub const fn null() -> Self {
        Self {
            bytes: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    fn empty() -> Self {
        Self {
            bytes: Some(&[]),
            len: 0,
            _marker: PhantomData,
        }
    }

    pub fn is_null(&self) -> bool {
        self.bytes.is_none()
    }

    /// Number of `T`s in the view.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The underlying bytes (empty for the null view).
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes.unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &'a [T] {
        match self.bytes {
            Some(bytes) if !bytes.is_empty() => bytemuck::cast_slice(bytes),
            _ => &[],
        }
    }

    /// Pointer to the first value; null for the null view.
    pub fn begin(&self) -> *const T {
        match self.bytes {
            Some(bytes) => bytes.as_ptr().cast(),
            None => std::ptr::null(),
        }
    }

    /// Pointer one past the last value.
    pub fn end(&self) -> *const T {
        self.begin().wrapping_add(self.len)
    }

    pub fn as_ptr_range(&self) -> Range<*const T> {
        self.begin()..self.end()
    }

    pub fn get(&self, n: usize) -> Option<&'a T> {
        self.as_slice().get(n)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.as_slice().iter()
    }

    /// Read the whole view as one value of type `U`.
    ///
    /// The byte length must equal `size_of::<U>()` exactly.
    pub fn cast<U: AnyBitPattern>(&self) -> Result<&'a U, ViewError> {
        let bytes = self.as_bytes();
        if size_of::<U>() == 0 || bytes.len() != size_of::<U>() {
            return Err(ViewError::SizeMismatch {
                len: bytes.len(),
                size: size_of::<U>(),
            });
        }
        check_alignment(bytes, align_of::<U>())?;
        Ok(bytemuck::from_bytes(bytes))
    }

    /// Read the view as an array of another element type.
    ///
    /// Never truncates: the byte length must divide evenly by
    /// `size_of::<U>()`. A null view stays null.
    pub fn cast_slice<U: AnyBitPattern>(&self) -> Result<AlignedView<'a, U>, ViewError> {
        match self.bytes {
            Some(bytes) => AlignedView::from_bytes(bytes),
            None => Ok(AlignedView::null()),
        }
    }

    /// The `count` values starting at `offset`.
    pub fn sub_view(&self, offset: usize, count: usize) -> Result<Self, ViewError> {
        let out_of_bounds = ViewError::OutOfBounds {
            offset,
            count,
            len: self.len,
        };
        match offset.checked_add(count) {
            Some(stop) if stop <= self.len => {}
            _ => return Err(out_of_bounds),
        }
        if self.is_null() {
            return Ok(*self);
        }
        let size = size_of::<T>();
        let bytes = &self.as_bytes()[offset * size..(offset + count) * size];
        Ok(Self {
            bytes: Some(bytes),
            len: count,
            _marker: PhantomData,
        })
    }
}

impl<'a, T: AnyBitPattern> Default for AlignedView<'a, T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<'a, T: AnyBitPattern> Index<usize> for AlignedView<'a, T> {
    type Output = T;

    fn index(&self, n: usize) -> &T {
        let len = self.len;
        match self.as_slice().get(n) {
            Some(value) => value,
            None => panic!("index {n} out of bounds for view of {len}"),
        }
    }
}

impl<'a, 'v, T: AnyBitPattern> IntoIterator for &'v AlignedView<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: AnyBitPattern + fmt::Debug> fmt::Debug for AlignedView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("AlignedView(null)");
        }
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<u64> {
        vec![10, 20, 30, 40]
    }

    #[test]
    fn test_from_bytes_counts_elements() {
        let words = words();
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let view = AlignedView::<u64>::from_bytes(bytes).unwrap();
        assert_eq!(view.size(), 4);
        assert_eq!(view[2], 30);
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), words);
    }

    #[test]
    fn test_from_bytes_rejects_partial_element() {
        let words = words();
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let err = AlignedView::<u64>::from_bytes(&bytes[..12]).unwrap_err();
        assert_eq!(err, ViewError::SizeMismatch { len: 12, size: 8 });
    }

    #[test]
    fn test_from_bytes_rejects_misaligned_start() {
        let words = words();
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let err = AlignedView::<u64>::from_bytes(&bytes[1..9]).unwrap_err();
        assert!(matches!(err, ViewError::Misaligned { align: 8, .. }));
    }

    #[test]
    fn test_empty_bytes_skip_alignment() {
        let words = words();
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let view = AlignedView::<u64>::from_bytes(&bytes[3..3]).unwrap();
        assert!(view.is_empty());
        assert!(!view.is_null());
        assert!(view.as_slice().is_empty());
    }

    #[test]
    fn test_null_view() {
        let view = AlignedView::<u64>::null();
        assert!(view.is_null());
        assert_eq!(view.size(), 0);
        assert!(view.begin().is_null());
        assert_eq!(view.begin(), view.end());
        assert!(view.get(0).is_none());
        assert!(view.cast_slice::<u32>().unwrap().is_null());
    }

    #[test]
    fn test_pointer_constructors_match_slice() {
        let words = words();
        let view = AlignedView::from_slice(&words);
        let by_count =
            unsafe { AlignedView::from_raw_parts(words.as_ptr(), words.len()) }.unwrap();
        let by_range = unsafe { AlignedView::from_ptr_range(view.begin(), view.end()) }.unwrap();
        assert_eq!(by_count.size(), view.size());
        assert_eq!(by_range.size(), view.size());
        assert_eq!(by_range.begin(), view.begin());
        assert_eq!(by_range.end(), view.end());
    }

    #[test]
    fn test_pointer_constructors_reject_zero_sized() {
        let units = [(), (), ()];
        let range = units.as_ptr_range();

        let err = unsafe { AlignedView::from_raw_parts(units.as_ptr(), units.len()) }.unwrap_err();
        assert_eq!(err, ViewError::SizeMismatch { len: 0, size: 0 });
        let err = unsafe { AlignedView::from_ptr_range(range.start, range.end) }.unwrap_err();
        assert_eq!(err, ViewError::SizeMismatch { len: 0, size: 0 });
        assert!(AlignedView::<()>::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_zero_count_is_empty_not_null() {
        let words = words();
        let view = unsafe { AlignedView::from_raw_parts(words.as_ptr(), 0) }.unwrap();
        assert!(view.is_empty());
        assert!(!view.is_null());
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let words = words();
        let view = AlignedView::from_slice(&words);
        let value = view[4];
        assert_eq!(value, 0);
    }

    #[test]
    fn test_cast_single_value() {
        let words = [0x0000_0002_0000_0001u64];
        let view = AlignedView::from_slice(&words);
        let pair: &[u32; 2] = view.cast().unwrap();
        assert_eq!(bytemuck::cast::<[u32; 2], u64>(*pair), words[0]);
    }

    #[test]
    fn test_cast_requires_exact_size() {
        let words = words();
        let view = AlignedView::from_slice(&words);
        let err = view.cast::<u64>().unwrap_err();
        assert_eq!(err, ViewError::SizeMismatch { len: 32, size: 8 });
    }

    #[test]
    fn test_cast_slice_divisible() {
        let words = words();
        let view = AlignedView::from_slice(&words);
        let halves = view.cast_slice::<u32>().unwrap();
        assert_eq!(halves.size(), 8);
        let back = halves.cast_slice::<u64>().unwrap();
        assert_eq!(back.as_slice(), words.as_slice());
    }

    #[test]
    fn test_cast_slice_never_truncates() {
        let words = words();
        let view = AlignedView::from_slice(&words[..3]);
        let err = view.cast_slice::<[u64; 2]>().unwrap_err();
        assert_eq!(err, ViewError::SizeMismatch { len: 24, size: 16 });
    }

    #[test]
    fn test_cast_slice_checks_alignment() {
        let words = words();
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let view = AlignedView::<u8>::from_bytes(&bytes[4..20]).unwrap();
        let err = view.cast_slice::<u64>().unwrap_err();
        assert!(matches!(err, ViewError::Misaligned { align: 8, .. }));
    }

    #[test]
    fn test_sub_view_matches_parent() {
        let words = words();
        let view = AlignedView::from_slice(&words);
        let sub = view.sub_view(1, 2).unwrap();
        assert_eq!(sub.as_slice(), &words[1..3]);
        assert_eq!(view.sub_view(4, 0).unwrap().size(), 0);
    }

    #[test]
    fn test_sub_view_bounds() {
        let words = words();
        let view = AlignedView::from_slice(&words);
        assert_eq!(
            view.sub_view(3, 2).unwrap_err(),
            ViewError::OutOfBounds {
                offset: 3,
                count: 2,
                len: 4
            }
        );
        assert!(view.sub_view(usize::MAX, 2).is_err());
    }
}
