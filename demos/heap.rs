use std::io::Read;

use libc::sbrk;
use rheap::{Growth, Heap, HeapError};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap` or
/// `gdb`, or just watch the program break move between steps.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn main() -> Result<(), HeapError> {
  env_logger::init();

  // Touch stdout before the heap takes over the break, so its buffer is
  // already in place.
  print_program_break("start");

  // The heap owns the program break from here on.
  let mut heap = unsafe { Heap::user() };

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Allocate 100 bytes. The first call also places the sentinel.
  // --------------------------------------------------------------------
  let first = heap.allocate(100)?;
  println!("\n[1] Allocate 100 bytes at {:?}", first);
  unsafe { first.cast::<u32>().write(0xDEADBEEF) };
  println!("[1] Value written = 0x{:X}", unsafe { first.cast::<u32>().read() });
  println!("[1] {}", heap.dump());

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Allocate 12 bytes. Sizes are rounded up to a multiple of eight.
  // --------------------------------------------------------------------
  let second = heap.allocate(12)?;
  unsafe { second.as_ptr().write_bytes(0xAB, 12) };
  println!("\n[2] Allocate 12 bytes at {:?}", second);
  println!("[2] {}", heap.dump());

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Allocate 64 bytes on a 4096 byte boundary. The padding in front
  //    becomes a free filler block.
  // --------------------------------------------------------------------
  let page = heap.allocate_aligned(4096, 64)?;
  println!("\n[3] Allocate 64 bytes aligned to 4096 at {:?}", page);
  let page_addr = page.as_ptr() as usize;
  println!("[3] Address = {:#X}, addr % 4096 = {}", page_addr, page_addr % 4096);
  println!("[3] {}", heap.dump());

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Free the first block and ask for 50 bytes: first fit finds it.
  // --------------------------------------------------------------------
  unsafe { heap.free(first)? };
  let reused = heap.allocate(50)?;
  println!("\n[4] Freed {:?}, then allocated 50 bytes at {:?}", first, reused);
  println!(
    "[4] Reused the freed block? {}",
    if reused == first { "Yes" } else { "No" }
  );

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Allocate 64 KiB and watch the break move.
  // --------------------------------------------------------------------
  print_program_break("before large alloc");
  let big = heap.allocate(64 * 1024)?;
  println!("\n[5] Allocate 64 KiB at {:?}", big);
  println!("[5] Heap committed up to {:#X}", heap.growth().committed_end());
  print_program_break("after large alloc");

  heap.check()?;
  heap.log_blocks();

  println!("\n[6] End of example. Process will exit and the OS will reclaim all memory.");

  Ok(())
}
