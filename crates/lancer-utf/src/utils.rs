//! Bounds-checked slicing helpers shared by the reader

use crate::error::{UtfError, UtfResult};

/// Borrow `len` bytes at `base + offset`, failing with `OutOfBounds` when
/// any part of the range is negative or past the end of `data`.
pub fn slice_at<'a>(
    data: &'a [u8],
    region: &'static str,
    base: i64,
    offset: i64,
    len: i64,
) -> UtfResult<&'a [u8]> {
    let out_of_bounds = || UtfError::OutOfBounds {
        region,
        offset: base.saturating_add(offset),
        len,
    };

    let start = base.checked_add(offset).ok_or_else(out_of_bounds)?;
    if start < 0 || len < 0 {
        return Err(out_of_bounds());
    }
    let end = start.checked_add(len).ok_or_else(out_of_bounds)?;

    let start = usize::try_from(start).map_err(|_| out_of_bounds())?;
    let end = usize::try_from(end).map_err(|_| out_of_bounds())?;
    data.get(start..end).ok_or_else(out_of_bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_within_bounds() {
        let data = [0u8, 1, 2, 3, 4, 5];
        assert_eq!(
            slice_at(&data, "test", 2, 1, 3).expect("in bounds"),
            &[3, 4, 5]
        );
        assert_eq!(slice_at(&data, "test", 6, 0, 0).expect("empty"), &[] as &[u8]);
    }

    #[test]
    fn test_slice_rejects_negative_and_overflow() {
        let data = [0u8; 8];
        assert!(matches!(
            slice_at(&data, "test", 0, -1, 2),
            Err(UtfError::OutOfBounds { offset: -1, .. })
        ));
        assert!(slice_at(&data, "test", 0, 0, -4).is_err());
        assert!(slice_at(&data, "test", 4, 2, 4).is_err());
        assert!(slice_at(&data, "test", i64::MAX, 1, 1).is_err());
    }
}
