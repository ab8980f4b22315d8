mod common;

use std::{ptr, slice};

use rheap::{DemandGrowth, Growth, HEADER_SIZE, Heap, HeapConfig, HeapError, MIN_ALIGN, footprint};
use test_log::test;

use common::{FakeBreak, Region, addr};

#[test]
fn test_scenario_in_a_4k_window() {
  let region = Region::new(4096);
  let mut heap = region.heap();
  let base = region.window().base;

  let first = heap.allocate(100).unwrap();
  assert_eq!(addr(first), base + 2 * HEADER_SIZE);

  unsafe { heap.free(first).unwrap() };
  assert_eq!(heap.allocate(50).unwrap(), first);

  assert!(matches!(
    heap.allocate(4000),
    Err(HeapError::OutOfMemory { .. })
  ));
  assert_eq!(heap.debug_dump(), vec![(0, true), (104, true)]);
}

#[test]
fn test_written_bytes_read_back() {
  let region = Region::new(64 * 1024);
  let mut heap = region.heap();
  let mut written = Vec::new();

  for (i, n) in [0usize, 1, 7, 8, 9, 4096].into_iter().enumerate() {
    let ptr = heap.allocate(n).unwrap();
    let pattern: Vec<u8> = (0..n).map(|j| (i * 31 + j) as u8).collect();

    unsafe { ptr::copy_nonoverlapping(pattern.as_ptr(), ptr.as_ptr(), n) };
    written.push((ptr, pattern));
  }

  // Later writes must not have clobbered earlier blocks.
  for (ptr, pattern) in &written {
    let stored = unsafe { slice::from_raw_parts(ptr.as_ptr(), pattern.len()) };
    assert_eq!(stored, pattern.as_slice());
  }
  assert_eq!(heap.check(), Ok(()));
}

#[test]
fn test_aligned_allocations() {
  let region = Region::new(1024 * 1024);
  let mut heap = region.heap();

  for align in [8, 16, 64, 4096] {
    for size in [1, 100, 5000] {
      let ptr = heap.allocate_aligned(align, size).unwrap();
      assert_eq!(addr(ptr) % align, 0, "align {} size {}", align, size);
    }
  }
  assert_eq!(heap.check(), Ok(()));
}

#[test]
fn test_freed_block_is_reused() {
  let region = Region::new(4096);
  let mut heap = region.heap();

  let a = heap.allocate(100).unwrap();
  unsafe { heap.free(a).unwrap() };
  let b = heap.allocate(100).unwrap();

  assert_eq!(a, b);
}

#[test]
fn test_reuse_respects_alignment() {
  let region = Region::new(64 * 1024);
  let mut heap = region.heap();

  let a = heap.allocate(256).unwrap();
  unsafe { heap.free(a).unwrap() };

  // `a` follows the sentinel, so its payload cannot be 4096 aligned.
  let b = heap.allocate_aligned(4096, 64).unwrap();
  assert_ne!(a, b);
  assert_eq!(addr(b) % 4096, 0);
  assert_eq!(heap.allocate(64).unwrap(), a);
}

#[test]
fn test_adjacent_free_blocks_are_not_merged() {
  let region = Region::new(4096);
  let mut heap = region.heap();

  let a = heap.allocate(64).unwrap();
  let b = heap.allocate(64).unwrap();
  assert_eq!(addr(b), addr(a) + 64 + HEADER_SIZE);

  unsafe {
    heap.free(a).unwrap();
    heap.free(b).unwrap();
  }

  let c = heap.allocate(120).unwrap();
  assert!(addr(c) > addr(b));
  assert_eq!(heap.tail().unwrap().payload, addr(c));
  assert_eq!(
    heap.debug_dump(),
    vec![(0, true), (64, false), (64, false), (120, true)]
  );
}

#[test]
fn test_exhaustion_at_the_exact_ceiling() {
  let capacity = HEADER_SIZE + 10 * footprint(64);
  let region = Region::new(capacity);
  let mut heap = region.heap();
  let end = region.window().end();

  for _ in 0..10 {
    heap.allocate(64).unwrap();
  }
  let tail = heap.tail().unwrap();
  assert_eq!(tail.payload + tail.size, end);

  assert_eq!(
    heap.allocate(0),
    Err(HeapError::OutOfMemory {
      required_end: end + HEADER_SIZE,
      committed_end: end,
    })
  );
}

#[test]
fn test_exhaustion_never_early() {
  let region = Region::new(2048);
  let mut heap = region.heap();
  let end = region.window().end();

  heap.allocate(40).unwrap();

  loop {
    let tail = heap.tail().unwrap();
    let projected = tail.payload + tail.size + footprint(40);

    match heap.allocate(40) {
      Ok(_) => assert!(projected <= end),
      Err(error) => {
        assert!(projected > end);
        assert_eq!(
          error,
          HeapError::OutOfMemory {
            required_end: projected,
            committed_end: end,
          }
        );
        break;
      }
    }
  }
}

#[test]
fn test_exhausted_heap_still_serves_freed_blocks() {
  let region = Region::new(1024);
  let mut heap = region.heap();

  let mut blocks = Vec::new();
  while let Ok(ptr) = heap.allocate(96) {
    blocks.push(ptr);
  }

  unsafe { heap.free(blocks[2]).unwrap() };
  assert_eq!(heap.allocate(96).unwrap(), blocks[2]);
}

#[test]
fn test_demand_growth_moves_the_break() {
  let region = Region::new(64 * 1024);
  let growth = unsafe { DemandGrowth::new(FakeBreak::new(&region)) };
  let mut heap = Heap::new(growth, HeapConfig::user());
  let base = region.window().base;

  let ptr = heap.allocate(100).unwrap();
  assert_eq!(addr(ptr), base + 2 * HEADER_SIZE);

  assert_eq!(heap.growth().committed_end(), addr(ptr) + 104);

  let aligned = heap.allocate_aligned(4096, 8).unwrap();
  assert_eq!(addr(aligned) % 4096, 0);
  assert_eq!(heap.growth().committed_end(), addr(aligned) + 8);
}

#[test]
fn test_demand_growth_refusal_is_recoverable() {
  let region = Region::new(4096);
  let growth = unsafe { DemandGrowth::new(FakeBreak::new(&region)) };
  let mut heap = Heap::with_growth(growth);

  let a = heap.allocate(2048).unwrap();
  assert!(matches!(
    heap.allocate(2048),
    Err(HeapError::OutOfMemory { .. })
  ));

  unsafe { heap.free(a).unwrap() };
  assert_eq!(heap.allocate(2048).unwrap(), a);
}

#[test]
fn test_invalid_alignment_is_rejected() {
  let region = Region::new(4096);
  let mut heap = region.heap();

  assert_eq!(
    heap.allocate_aligned(MIN_ALIGN / 2, 8),
    Err(HeapError::InvalidAlignment { align: MIN_ALIGN / 2 })
  );
  assert_eq!(
    heap.allocate_aligned(24, 8),
    Err(HeapError::InvalidAlignment { align: 24 })
  );
}

#[test]
fn test_heaps_are_independent() {
  let left = Region::new(4096);
  let right = Region::new(4096);
  let mut a = left.heap();
  let mut b = right.heap();

  let pa = a.allocate(16).unwrap();
  let pb = b.allocate(16).unwrap();

  assert_eq!(addr(pa) - left.window().base, addr(pb) - right.window().base);
  assert_eq!(
    unsafe { a.free(pb) },
    Err(HeapError::InvalidFree { addr: addr(pb) })
  );
}
