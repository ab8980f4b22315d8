#![allow(dead_code)]

use std::alloc::{self, Layout};

use rheap::{BoundedGrowth, Heap, ProgramBreak, Window};

/// Page aligned scratch memory, released on drop.
pub struct Region {
  base: *mut u8,
  layout: Layout,
}

impl Region {
  pub fn new(capacity: usize) -> Self {
    let layout = Layout::from_size_align(capacity, 4096).unwrap();
    let base = unsafe { alloc::alloc_zeroed(layout) };
    assert!(!base.is_null());

    Self { base, layout }
  }

  pub fn window(&self) -> Window {
    Window::new(self.base as usize, self.layout.size())
  }

  /// A heap over this region. It must not outlive the region.
  pub fn heap(&self) -> Heap<BoundedGrowth> {
    Heap::with_growth(unsafe { BoundedGrowth::new(self.window()) })
  }
}

impl Drop for Region {
  fn drop(&mut self) {
    unsafe { alloc::dealloc(self.base, self.layout) };
  }
}

/// Program break over a region, refusing to move past its end.
pub struct FakeBreak {
  pub brk: usize,
  pub limit: usize,
}

impl FakeBreak {
  pub fn new(region: &Region) -> Self {
    let window = region.window();

    Self {
      brk: window.base,
      limit: window.end(),
    }
  }
}

impl ProgramBreak for FakeBreak {
  fn current(&mut self) -> usize {
    self.brk
  }

  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<usize> {
    if self.brk + increment > self.limit {
      return None;
    }

    let previous = self.brk;
    self.brk += increment;

    Some(previous)
  }
}

pub fn addr(ptr: std::ptr::NonNull<u8>) -> usize {
  ptr.as_ptr() as usize
}
