use crate::error::Result;

/// Supplies the address range a [`Heap`](crate::Heap) carves blocks out of.
///
/// The heap asks for its starting address once, then calls
/// [`reserve`](Growth::reserve) before every block it appends.
///
/// # Safety
///
/// Every byte from [`origin`](Growth::origin) up to the end returned by a
/// successful [`reserve`](Growth::reserve) must be writable memory that
/// nothing but the heap touches, for as long as the implementor lives.
pub unsafe trait Growth {
  /// Address the first block may be placed at.
  fn origin(&mut self) -> Result<usize>;

  /// Makes sure everything below `required_end` is backed. Returns the new
  /// committed end, which is at least `required_end`.
  fn reserve(
    &mut self,
    required_end: usize,
  ) -> Result<usize>;

  /// End of the range backed so far.
  fn committed_end(&self) -> usize;
}
