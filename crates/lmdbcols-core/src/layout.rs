//! Layout rule for keys and values
//!
//! LMDB only promises loose alignment for stored blobs. Keeping every key
//! and value at a size that is a non-zero multiple of eight bytes keeps each
//! record in a page starting on an eight byte boundary, which is what makes
//! reading values in place sound.
//!
//! The rule is checked when a collection type is instantiated: a collection
//! over an invalid type does not build.
//!
//! ```compile_fail
//! use lmdbcols_core::Record;
//!
//! fn check<T: Record>() {
//!     let () = T::LAYOUT_CHECK;
//! }
//!
//! check::<u32>(); // four bytes: rejected at build time
//! ```

use bytemuck::Pod;
use std::mem::{align_of, size_of};

/// Every stored key and value is a multiple of this many bytes.
pub const RECORD_ALIGNMENT: usize = 8;

/// Whether a type of `size` bytes may be stored unpadded.
pub const fn is_valid_record_layout(size: usize) -> bool {
    size != 0 && size % RECORD_ALIGNMENT == 0
}

pub const fn is_valid_record<T: Pod>() -> bool {
    is_valid_record_layout(size_of::<T>())
}

/// Whether `T` can be stored through [`EightPadded`](crate::EightPadded).
///
/// Stored values are only ever eight byte aligned, so a type that needs a
/// stricter alignment could not be read back in place.
pub const fn is_paddable<T>() -> bool {
    size_of::<T>() > 0 && align_of::<T>() <= RECORD_ALIGNMENT
}

/// A POD type that can be stored as a key or value without padding.
///
/// Implemented for every [`Pod`] type; the size requirement is enforced
/// through [`Record::LAYOUT_CHECK`], which collections evaluate in their
/// constructors.
pub trait Record: Pod {
    /// Bytes occupied in the store.
    const SIZE: usize = size_of::<Self>();

    const LAYOUT_CHECK: () = assert!(
        is_valid_record_layout(size_of::<Self>()),
        "record types must be a non-empty multiple of 8 bytes; wrap them in EightPadded or use a padded collection"
    );
}

impl<T: Pod> Record for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    struct Quote {
        bid: f64,
        ask: f64,
        venue: u32,
        flags: u32,
    }

    #[test]
    fn test_valid_records() {
        assert!(is_valid_record::<f64>());
        assert!(is_valid_record::<u64>());
        assert!(is_valid_record::<[u8; 16]>());
        assert!(is_valid_record::<Quote>());
        assert_eq!(<Quote as Record>::SIZE, 24);
    }

    #[test]
    fn test_invalid_records() {
        assert!(!is_valid_record::<u8>());
        assert!(!is_valid_record::<u32>());
        assert!(!is_valid_record::<[u8; 12]>());
        assert!(!is_valid_record::<()>());
    }

    #[test]
    fn test_paddable_types() {
        #[repr(C, align(16))]
        struct Wide([u8; 16]);

        assert!(is_paddable::<u8>());
        assert!(is_paddable::<[u16; 3]>());
        assert!(is_paddable::<Quote>());
        assert!(!is_paddable::<()>());
        assert!(!is_paddable::<Wide>());
    }

    #[test]
    fn test_layout_check_passes_for_valid_record() {
        let () = <u64 as Record>::LAYOUT_CHECK;
        let () = <Quote as Record>::LAYOUT_CHECK;
    }
}
