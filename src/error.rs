use thiserror::Error;

/// Everything an allocator operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
  #[error("out of memory: heap must reach {required_end:#x}, backing ends at {committed_end:#x}")]
  OutOfMemory {
    required_end: usize,
    committed_end: usize,
  },

  #[error("invalid alignment {align}: must be a power of two of at least 8")]
  InvalidAlignment { align: usize },

  #[error("address {addr:#x} was not returned by this heap")]
  InvalidFree { addr: usize },

  #[error("address {addr:#x} is already free")]
  DoubleFree { addr: usize },

  /// The break no longer ends where the heap does. The growth that reported
  /// it refuses to move the break again, so later requests fail the same way
  /// without leaking more memory.
  #[error("host extended the break at {found:#x}, heap ends at {expected:#x}")]
  Discontiguous { expected: usize, found: usize },

  #[error("block at {addr:#x} has a malformed header")]
  Malformed { addr: usize },

  #[error("block at {addr:#x} links backwards to {next:#x}")]
  Disordered { addr: usize, next: usize },
}

pub type Result<T> = core::result::Result<T, HeapError>;
