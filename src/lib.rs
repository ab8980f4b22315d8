//! # rheap - A First-Fit Block Heap
//!
//! This crate provides a small **first-fit heap** that hands out memory of any
//! size at any power-of-two alignment, and takes it back again. The same engine
//! runs over a fixed kernel window or on top of the process break.
//!
//! ## Overview
//!
//! Every allocation lives in a block. Blocks form a singly linked list ordered
//! by address, starting at a zero sized sentinel:
//!
//! ```text
//!   Block Chain:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         HEAP MEMORY                                  │
//!   │                                                                      │
//!   │   ┌───┬─────────┬─────┬────────┬──────────┬────────────────────────┐ │
//!   │   │ S │  A (#)  │  F  │ B (#)  │  C       │       uncommitted      │ │
//!   │   └───┴─────────┴─────┴────────┴──────────┴────────────────────────┘ │
//!   │     ▲                                      ▲                       ▲ │
//!   │     │                                      │                       │ │
//!   │   sentinel                               tail end            window  │
//!   │                                                              or break│
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   S = sentinel, F = filler left by alignment, # = used.
//! ```
//!
//! A request first scans the chain for a free block that is large enough and
//! whose payload already has the requested alignment. On a miss a new block
//! is appended past the tail, after asking the [`Growth`] capability to back
//! the extra bytes.
//!
//! ## Crate Structure
//!
//! ```text
//!   rheap
//!   ├── align    - Alignment helpers (align_to!, checked_align_to)
//!   ├── block    - Block header with packed size and used bit (internal)
//!   ├── config   - HeapConfig, Exhaustion, Window, MIN_ALIGN
//!   ├── error    - HeapError
//!   ├── growth   - Growth capability trait
//!   ├── bounded  - BoundedGrowth over a fixed window
//!   ├── demand   - DemandGrowth over a program break (sbrk)
//!   ├── heap     - Heap: allocation and deallocation
//!   └── dump     - Chain listing and structural check
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rheap::{BoundedGrowth, Heap};
//!
//! let region = Box::leak(vec![0u8; 4096].into_boxed_slice());
//! let mut heap = Heap::with_growth(BoundedGrowth::from_region(region));
//!
//! let ptr = heap.allocate(100).unwrap();
//! unsafe { heap.free(ptr).unwrap() };
//!
//! // The freed block is found again before the heap grows.
//! assert_eq!(heap.allocate(50).unwrap(), ptr);
//! ```
//!
//! ## Block Layout
//!
//! ```text
//!   Single Allocation:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ next: null/ptr  │  │  ┌──────────────────────────┐  │
//!   │  │ size: N | used  │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  └──────────────────────────┘  │
//!   │   HEADER_SIZE bytes   │                                │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! `N` is always a multiple of eight, which frees bit 0 of the size word to
//! hold the used flag.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: a `Heap` has no synchronization of its own
//! - **No coalescing**: adjacent free blocks are never merged
//! - **No splitting**: a reused block keeps its full size
//! - **Monotonic**: blocks are never returned to the growth capability
//!
//! ## Safety
//!
//! Growth implementations promise the memory they report is the heap's alone,
//! which is what lets [`Heap::allocate`] be safe. Freeing stays `unsafe`
//! because an unchecked heap trusts the address it is given.

pub mod align;
mod block;
mod bounded;
mod config;
mod demand;
mod dump;
mod error;
mod growth;
mod heap;

pub use block::HEADER_SIZE;
pub use bounded::BoundedGrowth;
pub use config::{Exhaustion, HeapConfig, MIN_ALIGN, Window};
#[cfg(unix)]
pub use demand::Sbrk;
pub use demand::{DemandGrowth, ProgramBreak};
pub use dump::{Blocks, Dump};
pub use error::{HeapError, Result};
pub use growth::Growth;
pub use heap::{BlockInfo, Heap, footprint};
