use std::{mem, ptr};

/// Low bit of [`Block::size`]. Capacities are multiples of eight, so the bit
/// is otherwise always clear.
const USED: usize = 1;

/// Bytes between a block's address and its payload.
pub const HEADER_SIZE: usize = mem::size_of::<Block>();

/// Header of a chunk of heap memory. The payload follows it directly.
///
/// ```text
///   ┌──────────────┬──────────────────┬───────────────────────────┐
///   │ next: *Block │ size | used (b0) │ payload (capacity bytes)  │
///   └──────────────┴──────────────────┴───────────────────────────┘
///   ▲                                 ▲
///   block address                     block address + HEADER_SIZE
/// ```
#[repr(C)]
pub struct Block {
  pub next: *mut Block,
  size: usize,
}

impl Block {
  pub fn new(
    capacity: usize,
    used: bool,
  ) -> Self {
    debug_assert_eq!(capacity & USED, 0);

    Self {
      next: ptr::null_mut(),
      size: capacity | used as usize,
    }
  }

  /// Payload size, with the used bit masked off.
  pub fn capacity(&self) -> usize {
    self.size & !USED
  }

  pub fn is_used(&self) -> bool {
    self.size & USED != 0
  }

  pub fn mark_used(&mut self) {
    self.size |= USED;
  }

  pub fn mark_free(&mut self) {
    self.size &= !USED;
  }

  /// Raw size word, including the used bit.
  #[cfg(test)]
  pub fn raw_size(&self) -> usize {
    self.size
  }

  pub fn addr(&self) -> usize {
    self as *const Block as usize
  }

  pub fn payload(&self) -> usize {
    self.addr() + HEADER_SIZE
  }

  /// First address past this block's payload.
  pub fn end(&self) -> usize {
    self.payload() + self.capacity()
  }

  /// Recovers the header in front of a payload address.
  pub fn from_payload(payload: usize) -> *mut Block {
    (payload - HEADER_SIZE) as *mut Block
  }
}
