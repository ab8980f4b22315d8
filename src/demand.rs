use crate::{HeapError, error::Result, growth::Growth};

/// Host call that moves the end of the process data segment.
pub trait ProgramBreak {
  /// Current break.
  fn current(&mut self) -> usize;

  /// Moves the break up by `increment` bytes and returns where it was, or
  /// `None` when the host refuses.
  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<usize>;
}

/// The process break, moved with `sbrk(2)`.
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct Sbrk;

#[cfg(unix)]
impl ProgramBreak for Sbrk {
  fn current(&mut self) -> usize {
    unsafe { libc::sbrk(0) as usize }
  }

  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<usize> {
    let increment = libc::intptr_t::try_from(increment).ok()?;
    let previous = unsafe { libc::sbrk(increment) };

    if previous == usize::MAX as *mut libc::c_void {
      return None;
    }

    Some(previous as usize)
  }
}

/// Growth that asks the host for more memory whenever the heap outgrows
/// what it has committed so far.
#[derive(Debug)]
pub struct DemandGrowth<B: ProgramBreak> {
  brk: B,
  boundary: usize,
  /// Where the host put memory that should have started at `boundary`.
  stray: Option<usize>,
}

impl<B: ProgramBreak> DemandGrowth<B> {
  /// # Safety
  ///
  /// Memory `brk` hands out must belong to the heap alone. In particular no
  /// other code may move the same break while the heap is in use.
  pub unsafe fn new(brk: B) -> Self {
    Self {
      brk,
      boundary: 0,
      stray: None,
    }
  }
}

unsafe impl<B: ProgramBreak> Growth for DemandGrowth<B> {
  fn origin(&mut self) -> Result<usize> {
    self.boundary = self.brk.current();

    Ok(self.boundary)
  }

  fn reserve(
    &mut self,
    required_end: usize,
  ) -> Result<usize> {
    if required_end <= self.boundary {
      return Ok(self.boundary);
    }

    if let Some(found) = self.stray {
      return Err(HeapError::Discontiguous {
        expected: self.boundary,
        found,
      });
    }

    let increment = required_end - self.boundary;
    let previous = self.brk.extend(increment).ok_or(HeapError::OutOfMemory {
      required_end,
      committed_end: self.boundary,
    })?;

    if previous != self.boundary {
      log::warn!("program break at {:#x}, heap ends at {:#x}", previous, self.boundary);
      self.stray = Some(previous);
      return Err(HeapError::Discontiguous {
        expected: self.boundary,
        found: previous,
      });
    }

    log::debug!(
      "program break moved {:#x} -> {:#x} (+{})",
      self.boundary,
      required_end,
      increment
    );
    self.boundary = required_end;

    Ok(self.boundary)
  }

  fn committed_end(&self) -> usize {
    self.boundary
  }
}
