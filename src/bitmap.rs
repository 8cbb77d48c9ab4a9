//! First-free bitmap allocator over the disk's block pool.
//!
//! Scans the bitmap word-at-a-time (`u64` lanes, `trailing_zeros` over the
//! word) rather than bit-by-bit, mirroring the lane-scan idiom of
//! `bitmap_alloc_impl` in the teacher (there: atomic `fetch_update` per `usize`
//! lane with `trailing_ones`, because the kernel's bitmap can be raced over by
//! several CPUs; here: a plain, non-atomic scan, since §5 of the specification
//! rules out concurrency inside the core). Bit polarity is flipped relative to
//! the teacher: here `1` means free, matching the specification's bitmap
//! semantics, so a free bit is found with `trailing_zeros` on the *unmodified*
//! word rather than the complemented one.

use crate::disk::Disk;
use crate::layout::BLOCK_SIZE;

/// Identifies a single block on disk.
pub type BlockId = u32;

fn scan_and_take(disk: &mut Disk) -> Option<BlockId> {
	let region_len = disk.bitmap_region().len();
	let word_count = region_len / 8;
	for word_idx in 0..word_count {
		let mut word_bytes = [0u8; 8];
		word_bytes.copy_from_slice(&disk.bitmap_region()[word_idx * 8..word_idx * 8 + 8]);
		let word = u64::from_le_bytes(word_bytes);
		if word == 0 {
			continue;
		}
		let bit = word.trailing_zeros() as usize;
		let block = (word_idx * 64 + bit) as BlockId;
		disk.set_bitmap_bit(block, false);
		disk.adjust_free_blocks(-1);
		return Some(block);
	}
	None
}

/// Allocates the lowest-indexed free block, without zeroing its contents.
pub fn allocate(disk: &mut Disk) -> Option<BlockId> {
	let target = disk.config().log_target;
	let zero_on_alloc = disk.config().zero_on_alloc;
	let block = scan_and_take(disk)?;
	log::trace!(target: target, "allocated block {block}");
	// Block 0 (the superblock) is consumed once during `Disk::new` before any
	// data block is addressable; it is never zeroed through this path since
	// `zero_block` forbids the null-sentinel value as an argument.
	if zero_on_alloc && block != 0 {
		disk.zero_block(block);
	}
	Some(block)
}

/// Allocates the lowest-indexed free block and zero-fills it.
///
/// Used whenever the block will be interpreted as a table of pointers
/// (single- and double-indirect blocks), so stale bytes are never mistaken
/// for pointers.
pub fn allocate_zeroed(disk: &mut Disk) -> Option<BlockId> {
	let block = scan_and_take(disk)?;
	disk.zero_block(block);
	log::trace!(target: disk.config().log_target, "allocated zeroed block {block}");
	Some(block)
}

/// Frees `block`. Freeing an already-free block is a silent no-op (the
/// specification tolerates double-free).
pub fn free(disk: &mut Disk, block: BlockId) {
	if disk.bitmap_bit(block) {
		return;
	}
	disk.set_bitmap_bit(block, true);
	disk.adjust_free_blocks(1);
	log::trace!(target: disk.config().log_target, "freed block {block}");
}

/// Logs allocator exhaustion exactly once at the call site that observed it,
/// never per internal scan iteration.
pub fn log_exhausted(disk: &Disk) {
	log::warn!(target: disk.config().log_target, "block allocator exhausted");
}

const _: () = assert!(BLOCK_SIZE > 0);

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::FsConfig;

	#[test]
	fn allocates_lowest_free_first() {
		let mut disk = Disk::new(FsConfig::default());
		let a = allocate(&mut disk).unwrap();
		let b = allocate(&mut disk).unwrap();
		assert!(b > a);
		assert_eq!(a, crate::layout::METADATA_BLOCKS as u32);
	}

	#[test]
	fn free_then_realloc_reuses_block() {
		let mut disk = Disk::new(FsConfig::default());
		let a = allocate(&mut disk).unwrap();
		free(&mut disk, a);
		let b = allocate(&mut disk).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn double_free_is_noop() {
		let mut disk = Disk::new(FsConfig::default());
		let before = disk.free_blocks();
		let a = allocate(&mut disk).unwrap();
		free(&mut disk, a);
		let after_first_free = disk.free_blocks();
		free(&mut disk, a);
		assert_eq!(disk.free_blocks(), after_first_free);
		assert_eq!(before, after_first_free);
	}

	#[test]
	fn exhaustion_returns_none() {
		let mut disk = Disk::new(FsConfig::default());
		let mut count = 0;
		while allocate(&mut disk).is_some() {
			count += 1;
		}
		assert_eq!(count, disk_total_free_at_start());
		assert!(allocate(&mut disk).is_none());
	}

	fn disk_total_free_at_start() -> u32 {
		(crate::layout::TOTAL_BLOCKS - crate::layout::METADATA_BLOCKS) as u32
	}

	#[test]
	fn allocate_zeroed_zero_fills() {
		let mut disk = Disk::new(FsConfig::default());
		let block = allocate(&mut disk).unwrap();
		disk.data_block_mut(block).fill(0xAA);
		free(&mut disk, block);
		let block2 = allocate_zeroed(&mut disk).unwrap();
		assert_eq!(block, block2);
		assert!(disk.data_block(block2).iter().all(|&b| b == 0));
	}
}
