use std::{fmt, marker::PhantomData};

use crate::{
  HeapError,
  block::Block,
  config::MIN_ALIGN,
  error::Result,
  growth::Growth,
  heap::{BlockInfo, Heap},
};

/// Iterator over the chain, in address order. It follows links blindly; use
/// [`Heap::check`] first on a chain that may be damaged.
pub struct Blocks<'a> {
  current: *const Block,
  _heap: PhantomData<&'a ()>,
}

impl Iterator for Blocks<'_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<BlockInfo> {
    let block = unsafe { self.current.as_ref() }?;
    self.current = block.next;

    Some(BlockInfo::of(block))
  }
}

/// Renders the chain as `0x68# -> 0x0 -> none`, where `#` marks used blocks.
pub struct Dump<'a, G: Growth> {
  heap: &'a Heap<G>,
}

impl<G: Growth> fmt::Display for Dump<'_, G> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    let mut current = self.heap.head_ptr();

    while let Some(block) = unsafe { current.as_ref() } {
      let marker = if block.is_used() { "# " } else { " " };
      write!(f, "{:#x}{}-> ", block.capacity(), marker)?;

      // A link that does not move forward would send the walk around in circles.
      if !block.next.is_null() && (block.next as usize) <= block.addr() {
        let next = block.next as usize;
        return write!(f, "chaining error: {:#x} overlaps a previous block", next);
      }
      current = block.next;
    }

    write!(f, "none")
  }
}

impl<G: Growth> Heap<G> {
  pub fn blocks(&self) -> Blocks<'_> {
    Blocks {
      current: self.head_ptr(),
      _heap: PhantomData,
    }
  }

  /// `(size, used)` for every block, sentinel included.
  pub fn debug_dump(&self) -> Vec<(usize, bool)> {
    self.blocks().map(|block| (block.size, block.used)).collect()
  }

  pub fn dump(&self) -> Dump<'_, G> {
    Dump { heap: self }
  }

  pub fn log_blocks(&self) {
    for block in self.blocks() {
      log::debug!(
        "block {:#x}: {} bytes{}",
        block.addr,
        block.size,
        if block.used { ", used" } else { "" }
      );
    }
  }

  /// Best-effort structural check of the chain.
  ///
  /// Verifies the sentinel, that every capacity is a multiple of
  /// [`MIN_ALIGN`] and that each block starts at or past the end of the
  /// previous one.
  pub fn check(&self) -> Result<()> {
    let mut blocks = self.blocks();

    let Some(head) = blocks.next() else {
      return Ok(());
    };
    if head.size != 0 || !head.used {
      return Err(HeapError::Malformed { addr: head.addr });
    }

    let mut previous = head;
    for block in blocks {
      if block.addr < previous.payload + previous.size {
        return Err(HeapError::Disordered {
          addr: previous.addr,
          next: block.addr,
        });
      }
      if block.size % MIN_ALIGN != 0 {
        return Err(HeapError::Malformed { addr: block.addr });
      }
      previous = block;
    }

    Ok(())
  }
}
