/// Rounds `value` up to the next multiple of `align`, which must be a power
/// of two.
///
/// # Examples
///
/// ```rust
/// use rheap::align_to;
///
/// assert_eq!(align_to!(13, 8), 16);
/// assert_eq!(align_to!(16, 8), 16);
/// assert_eq!(align_to!(1, 4096), 4096);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}

/// Like [`align_to!`], but returns `None` instead of overflowing.
pub fn checked_align_to(
  value: usize,
  align: usize,
) -> Option<usize> {
  debug_assert!(align.is_power_of_two());

  value.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// Returns whether `value` is a multiple of `align`.
pub fn is_aligned(
  value: usize,
  align: usize,
) -> bool {
  value & (align - 1) == 0
}
