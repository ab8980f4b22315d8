use std::ptr::{self, NonNull};

use crate::{
  HeapError, align_to,
  align::{checked_align_to, is_aligned},
  block::{Block, HEADER_SIZE},
  bounded::BoundedGrowth,
  config::{Exhaustion, HeapConfig, MIN_ALIGN, Window},
  error::Result,
  growth::Growth,
};

#[cfg(unix)]
use crate::demand::{DemandGrowth, Sbrk};

/// Read-only snapshot of one block in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
  pub addr: usize,
  pub payload: usize,
  pub size: usize,
  pub used: bool,
}

impl BlockInfo {
  pub(crate) fn of(block: &Block) -> Self {
    Self {
      addr: block.addr(),
      payload: block.payload(),
      size: block.capacity(),
      used: block.is_used(),
    }
  }
}

/// First-fit heap over an address-ordered chain of blocks.
///
/// ```text
///   head (sentinel)                                 tail
///   ┌────┐   ┌──────┬────────┐   ┌────┬───┐   ┌──────┬────────────┐
///   │ 0 #│──►│ hdr  │ 104  # │──►│hdr │ 8 │──►│ hdr  │  4096 #    │──► none
///   └────┘   └──────┴────────┘   └────┴───┘   └──────┴────────────┘
///                                  filler       aligned block
/// ```
///
/// Blocks are never removed: freeing clears the used bit and a later request
/// may pick the block up again if it is large enough and suitably aligned.
/// Neighbouring free blocks are not merged.
pub struct Heap<G: Growth> {
  head: *mut Block,
  tail: *mut Block,
  growth: G,
  config: HeapConfig,
}

impl<G: Growth> Heap<G> {
  pub fn new(
    growth: G,
    config: HeapConfig,
  ) -> Self {
    Self {
      head: ptr::null_mut(),
      tail: ptr::null_mut(),
      growth,
      config,
    }
  }

  pub fn with_growth(growth: G) -> Self {
    Self::new(growth, HeapConfig::default())
  }

  pub fn config(&self) -> HeapConfig {
    self.config
  }

  pub fn growth(&self) -> &G {
    &self.growth
  }

  /// Whether the sentinel has been created.
  pub fn is_initialized(&self) -> bool {
    !self.head.is_null()
  }

  pub fn head(&self) -> Option<BlockInfo> {
    unsafe { self.head.as_ref() }.map(BlockInfo::of)
  }

  pub fn tail(&self) -> Option<BlockInfo> {
    unsafe { self.tail.as_ref() }.map(BlockInfo::of)
  }

  pub(crate) fn head_ptr(&self) -> *const Block {
    self.head
  }

  /// Allocates `size` bytes at the minimum alignment.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>> {
    self.allocate_aligned(MIN_ALIGN, size)
  }

  /// Allocates `size` bytes whose address is a multiple of `align`.
  pub fn allocate_aligned(
    &mut self,
    align: usize,
    size: usize,
  ) -> Result<NonNull<u8>> {
    if !align.is_power_of_two() || align < MIN_ALIGN {
      return Err(HeapError::InvalidAlignment { align });
    }

    match self.try_allocate(align, size) {
      Err(error @ HeapError::OutOfMemory { .. }) if self.config.exhaustion == Exhaustion::Abort => {
        log::error!("heap exhausted: {}", error);
        panic!("heap exhausted: {}", error);
      }
      result => result,
    }
  }

  fn try_allocate(
    &mut self,
    align: usize,
    size: usize,
  ) -> Result<NonNull<u8>> {
    let size = checked_align_to(size, MIN_ALIGN).ok_or_else(|| self.overflow())?;

    if !self.is_initialized() {
      self.init()?;
    }

    let block = match self.find_free_block(size, align) {
      Some(block) => {
        unsafe { (*block).mark_used() };
        log::trace!("reused block at {:#x} for {} bytes", block as usize, size);
        block
      }
      None => self.grow(size, align)?,
    };

    // Payloads sit past a non-null header.
    Ok(unsafe { NonNull::new_unchecked((*block).payload() as *mut u8) })
  }

  /// Places the zero sized, used sentinel at the growth origin.
  fn init(&mut self) -> Result<()> {
    let origin = self.growth.origin()?;
    let addr = checked_align_to(origin, MIN_ALIGN).ok_or_else(|| self.overflow())?;
    let end = addr.checked_add(HEADER_SIZE).ok_or_else(|| self.overflow())?;

    self.growth.reserve(end)?;

    let sentinel = addr as *mut Block;
    unsafe { sentinel.write(Block::new(0, true)) };

    self.head = sentinel;
    self.tail = sentinel;
    log::debug!("heap sentinel at {:#x}", addr);

    Ok(())
  }

  /// First block that is free, holds `size` bytes and has a payload aligned
  /// to `align`.
  fn find_free_block(
    &self,
    size: usize,
    align: usize,
  ) -> Option<*mut Block> {
    let mut current = self.head;

    while let Some(block) = unsafe { current.as_ref() } {
      if !block.is_used() && block.capacity() >= size && is_aligned(block.payload(), align) {
        return Some(current);
      }
      current = block.next;
    }

    None
  }

  /// Appends a used block of `size` bytes past the tail, preceded by a free
  /// filler block when the alignment gap is large enough to hold one.
  fn grow(
    &mut self,
    size: usize,
    align: usize,
  ) -> Result<*mut Block> {
    let next = unsafe { (*self.tail).end() };

    let aligned = next
      .checked_add(HEADER_SIZE)
      .and_then(|payload| checked_align_to(payload, align))
      .map(|payload| payload - HEADER_SIZE)
      .ok_or_else(|| self.overflow())?;
    let required_end = aligned
      .checked_add(HEADER_SIZE)
      .and_then(|payload| payload.checked_add(size))
      .ok_or_else(|| self.overflow())?;

    self.growth.reserve(required_end)?;

    // Gaps too small for a header and one unit stay unreachable.
    let gap = aligned - next;
    if gap >= HEADER_SIZE + MIN_ALIGN {
      let filler = next as *mut Block;
      unsafe { filler.write(Block::new(gap - HEADER_SIZE, false)) };
      self.link(filler);
      log::debug!("filler block at {:#x} ({} bytes)", next, gap - HEADER_SIZE);
    } else if gap > 0 {
      log::trace!("{} bytes of alignment padding lost at {:#x}", gap, next);
    }

    let block = aligned as *mut Block;
    unsafe { block.write(Block::new(size, true)) };
    self.link(block);
    log::debug!("appended block at {:#x} ({} bytes, align {})", aligned, size, align);

    Ok(block)
  }

  /// Links `block` after the tail and makes it the new tail.
  fn link(
    &mut self,
    block: *mut Block,
  ) {
    debug_assert!(block as usize > self.tail as usize);

    unsafe { (*self.tail).next = block };
    self.tail = block;
  }

  /// Releases an address returned by [`allocate`](Heap::allocate) or
  /// [`allocate_aligned`](Heap::allocate_aligned).
  ///
  /// With [`HeapConfig::checked_free`] set, addresses that do not name a
  /// used block of this heap are rejected.
  ///
  /// # Safety
  ///
  /// Without `checked_free`, `ptr` must come from this heap and must not have
  /// been freed since.
  pub unsafe fn free(
    &mut self,
    ptr: NonNull<u8>,
  ) -> Result<()> {
    let addr = ptr.as_ptr() as usize;

    let block = if self.config.checked_free {
      self.find_block(addr).inspect_err(|error| log::warn!("rejected free: {}", error))?
    } else {
      Block::from_payload(addr)
    };

    unsafe { (*block).mark_free() };
    log::trace!("freed block at {:#x}", block as usize);

    Ok(())
  }

  /// Walks the chain for the used block whose payload is `addr`.
  fn find_block(
    &self,
    addr: usize,
  ) -> Result<*mut Block> {
    // The sentinel is never handed out.
    let mut current = unsafe { self.head.as_ref() }.map_or(ptr::null_mut(), |head| head.next);

    while let Some(block) = unsafe { current.as_ref() } {
      if block.payload() == addr {
        if !block.is_used() {
          return Err(HeapError::DoubleFree { addr });
        }
        return Ok(current);
      }
      if block.payload() > addr {
        break;
      }
      current = block.next;
    }

    Err(HeapError::InvalidFree { addr })
  }

  fn overflow(&self) -> HeapError {
    HeapError::OutOfMemory {
      required_end: usize::MAX,
      committed_end: self.growth.committed_end(),
    }
  }
}

impl Heap<BoundedGrowth> {
  /// Heap over a fixed window, with fatal exhaustion.
  ///
  /// # Safety
  ///
  /// See [`BoundedGrowth::new`].
  pub unsafe fn kernel(window: Window) -> Self {
    Self::new(unsafe { BoundedGrowth::new(window) }, HeapConfig::kernel())
  }
}

#[cfg(unix)]
impl Heap<DemandGrowth<Sbrk>> {
  /// Heap on top of the process break.
  ///
  /// # Safety
  ///
  /// See [`DemandGrowth::new`]: nothing else in the process may call `brk`
  /// or `sbrk` while the heap is alive.
  pub unsafe fn user() -> Self {
    Self::new(unsafe { DemandGrowth::new(Sbrk) }, HeapConfig::user())
  }
}

/// Footprint of a block holding `size` bytes, header included.
pub fn footprint(size: usize) -> usize {
  HEADER_SIZE + align_to!(size, MIN_ALIGN)
}
