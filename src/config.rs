/// Smallest alignment handed out. Every capacity is a multiple of it.
pub const MIN_ALIGN: usize = 8;

/// What the allocation engine does when the growth capability cannot cover
/// a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exhaustion {
  /// Return [`HeapError::OutOfMemory`](crate::HeapError::OutOfMemory).
  #[default]
  Report,
  /// Log and panic at the allocation call site. Only fatal when the binary
  /// does not unwind, see [`HeapConfig::kernel`].
  Abort,
}

/// Per-heap settings, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
  pub exhaustion: Exhaustion,
  /// Walk the chain on `free` and reject foreign or already freed addresses.
  pub checked_free: bool,
}

impl HeapConfig {
  /// Privileged deployment: running out of the window is fatal and `free`
  /// trusts its caller.
  ///
  /// [`Exhaustion::Abort`] raises a panic. Build the kernel with
  /// `panic = "abort"` (or a halting `#[panic_handler]`) so that nothing
  /// unwinds past the failed allocation.
  pub const fn kernel() -> Self {
    Self {
      exhaustion: Exhaustion::Abort,
      checked_free: false,
    }
  }

  /// Unprivileged deployment: failures are reported to the caller.
  pub const fn user() -> Self {
    Self {
      exhaustion: Exhaustion::Report,
      checked_free: true,
    }
  }
}

impl Default for HeapConfig {
  fn default() -> Self {
    Self::user()
  }
}

/// Fixed address range backing a bounded heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
  pub base: usize,
  pub capacity: usize,
}

impl Window {
  pub const fn new(
    base: usize,
    capacity: usize,
  ) -> Self {
    Self { base, capacity }
  }

  pub const fn end(&self) -> usize {
    self.base + self.capacity
  }
}
