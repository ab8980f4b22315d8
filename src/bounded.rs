use crate::{
  HeapError,
  config::Window,
  error::Result,
  growth::Growth,
};

/// Growth over a fixed window that can never be extended, as used by the
/// kernel heap.
#[derive(Debug)]
pub struct BoundedGrowth {
  window: Window,
  committed: usize,
}

impl BoundedGrowth {
  /// # Safety
  ///
  /// `window` must be writable memory owned exclusively by the heap this
  /// growth is handed to.
  pub unsafe fn new(window: Window) -> Self {
    Self {
      window,
      committed: window.base,
    }
  }

  /// Backs the heap with a region that lives for the rest of the program.
  pub fn from_region(region: &'static mut [u8]) -> Self {
    let window = Window::new(region.as_mut_ptr() as usize, region.len());

    unsafe { Self::new(window) }
  }

  pub fn window(&self) -> Window {
    self.window
  }
}

unsafe impl Growth for BoundedGrowth {
  fn origin(&mut self) -> Result<usize> {
    Ok(self.window.base)
  }

  fn reserve(
    &mut self,
    required_end: usize,
  ) -> Result<usize> {
    if required_end > self.window.end() {
      return Err(HeapError::OutOfMemory {
        required_end,
        committed_end: self.window.end(),
      });
    }

    self.committed = self.committed.max(required_end);

    Ok(self.committed)
  }

  fn committed_end(&self) -> usize {
    self.committed
  }
}
