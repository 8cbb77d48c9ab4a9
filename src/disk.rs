//! The contiguous byte region backing the whole filesystem, and typed,
//! bounds-checked views over its four partitions.
//!
//! Every other component goes through [`Disk`]; none of them compute raw byte
//! offsets themselves. This mirrors the teacher's intent behind `read_block`/
//! `zero_block` (one chokepoint for turning a block index into bytes) but
//! drops the page-cache indirection: there is exactly one owner of the byte
//! buffer and no concurrent readers, so a plain bounds-checked slice suffices
//! (see the "pointer graphs into a byte buffer" design note).

use crate::config::FsConfig;
use crate::inode::{self, Inode};
use crate::layout::*;
use crate::superblock::{self, Superblock};

/// Owns the disk's byte buffer and exposes typed views of its regions.
pub struct Disk {
	bytes: Box<[u8]>,
	config: FsConfig,
}

fn block_range(block: u32) -> core::ops::Range<usize> {
	let start = block as usize * BLOCK_SIZE;
	start..start + BLOCK_SIZE
}

impl Disk {
	/// Allocates a fresh, zeroed disk and initializes it: superblock counters,
	/// root directory inode, and a fully-free bitmap with blocks
	/// `0..METADATA_BLOCKS` consumed for metadata.
	///
	/// Initialization is destructive by construction: there is no "open an
	/// existing disk" path, since this filesystem never persists across
	/// restarts (see the Non-goals in the specification).
	pub fn new(config: FsConfig) -> Self {
		let mut disk = Self {
			bytes: vec![0u8; DISK_SIZE].into_boxed_slice(),
			config,
		};
		// Every bit free to start.
		let bitmap_bytes = (TOTAL_BLOCKS + 7) / 8;
		for byte in disk.bitmap_region_mut().iter_mut().take(bitmap_bytes) {
			*byte = 0xFF;
		}
		disk.set_superblock(&Superblock {
			free_blocks: TOTAL_BLOCKS as u32,
			free_inodes: MAX_INODES as u32,
			root_inode: Inode::new(crate::inode::InodeKind::Directory),
		});
		// Consume the metadata blocks through the ordinary allocation path so the
		// free-block counter and bitmap stay in lock-step (matches the spec's
		// "261 successive allocations" description of init).
		for expected in 0..METADATA_BLOCKS as u32 {
			let got = crate::bitmap::allocate(&mut disk).expect("metadata blocks must be free");
			debug_assert_eq!(got, expected);
		}
		log::debug!(
			target: disk.config.log_target,
			"initialized disk: {DISK_SIZE} bytes, {TOTAL_BLOCKS} blocks, {METADATA_BLOCKS} reserved for metadata"
		);
		disk
	}

	/// The configuration this disk was built with.
	pub fn config(&self) -> &FsConfig {
		&self.config
	}

	fn block_mut(&mut self, block: u32) -> &mut [u8] {
		&mut self.bytes[block_range(block)]
	}

	fn block(&self, block: u32) -> &[u8] {
		&self.bytes[block_range(block)]
	}

	// --- Superblock -------------------------------------------------------

	/// Reads the superblock (and embedded root inode).
	pub fn superblock(&self) -> Superblock {
		let block = self.block(SUPERBLOCK_BLOCK as u32);
		let mut buf = [0u8; superblock::SIZE];
		buf.copy_from_slice(&block[..superblock::SIZE]);
		Superblock::from_bytes(&buf)
	}

	/// Overwrites the superblock (and embedded root inode).
	pub fn set_superblock(&mut self, sb: &Superblock) {
		let bytes = sb.to_bytes();
		let block = self.block_mut(SUPERBLOCK_BLOCK as u32);
		block[..superblock::SIZE].copy_from_slice(&bytes);
	}

	pub fn free_blocks(&self) -> u32 {
		self.superblock().free_blocks
	}

	pub fn free_inodes(&self) -> u32 {
		self.superblock().free_inodes
	}

	fn with_superblock_mut<R>(&mut self, f: impl FnOnce(&mut Superblock) -> R) -> R {
		let mut sb = self.superblock();
		let r = f(&mut sb);
		self.set_superblock(&sb);
		r
	}

	pub(crate) fn adjust_free_blocks(&mut self, delta: i64) {
		self.with_superblock_mut(|sb| {
			sb.free_blocks = (sb.free_blocks as i64 + delta) as u32;
		});
	}

	pub(crate) fn adjust_free_inodes(&mut self, delta: i64) {
		self.with_superblock_mut(|sb| {
			sb.free_inodes = (sb.free_inodes as i64 + delta) as u32;
		});
	}

	// --- Inodes -------------------------------------------------------------

	fn inode_location(number: u16) -> (u32, usize) {
		debug_assert!(number as usize >= 1 && number as usize <= MAX_INODES);
		let index = number as usize - 1;
		let block = INODE_TABLE_START + index / INODES_PER_BLOCK;
		let offset = (index % INODES_PER_BLOCK) * inode::SIZE;
		(block as u32, offset)
	}

	/// Reads inode `number`. `0` is the root, embedded in the superblock.
	pub fn inode(&self, number: u16) -> Inode {
		if number == 0 {
			return self.superblock().root_inode;
		}
		let (block, offset) = Self::inode_location(number);
		let bytes = self.block(block);
		let mut buf = [0u8; inode::SIZE];
		buf.copy_from_slice(&bytes[offset..offset + inode::SIZE]);
		Inode::from_bytes(&buf)
	}

	/// Overwrites inode `number`. `0` is the root, embedded in the superblock.
	pub fn set_inode(&mut self, number: u16, value: &Inode) {
		if number == 0 {
			self.with_superblock_mut(|sb| sb.root_inode = *value);
			return;
		}
		let (block, offset) = Self::inode_location(number);
		let bytes = value.to_bytes();
		let region = self.block_mut(block);
		region[offset..offset + inode::SIZE].copy_from_slice(&bytes);
	}

	// --- Bitmap ---------------------------------------------------------------

	fn bitmap_region_mut(&mut self) -> &mut [u8] {
		let start = BITMAP_START * BLOCK_SIZE;
		let end = BITMAP_END * BLOCK_SIZE;
		&mut self.bytes[start..end]
	}

	pub(crate) fn bitmap_region(&self) -> &[u8] {
		let start = BITMAP_START * BLOCK_SIZE;
		let end = BITMAP_END * BLOCK_SIZE;
		&self.bytes[start..end]
	}

	/// Reads one byte of the bitmap region (bit 1 = free, bit 0 = allocated).
	pub(crate) fn bitmap_byte(&self, index: usize) -> u8 {
		self.bitmap_region()[index]
	}

	/// Overwrites one byte of the bitmap region.
	pub(crate) fn set_bitmap_byte(&mut self, index: usize, value: u8) {
		self.bitmap_region_mut()[index] = value;
	}

	/// Tells whether block `block` is marked free.
	pub fn bitmap_bit(&self, block: u32) -> bool {
		let block = block as usize;
		let byte = self.bitmap_byte(block / 8);
		(byte >> (block % 8)) & 1 == 1
	}

	/// Sets the free/allocated state of block `block`'s bit.
	pub(crate) fn set_bitmap_bit(&mut self, block: u32, free: bool) {
		let block = block as usize;
		let idx = block / 8;
		let mask = 1u8 << (block % 8);
		let mut byte = self.bitmap_byte(idx);
		if free {
			byte |= mask;
		} else {
			byte &= !mask;
		}
		self.set_bitmap_byte(idx, byte);
	}

	// --- Data blocks ------------------------------------------------------

	/// Byte view of data block `pointer` (a global block index, as stored in
	/// `Inode::location`). `pointer` must never be `0`.
	pub fn data_block(&self, pointer: u32) -> &[u8] {
		debug_assert_ne!(pointer, 0, "block pointer 0 is the null sentinel");
		self.block(pointer)
	}

	/// Mutable byte view of data block `pointer`.
	pub fn data_block_mut(&mut self, pointer: u32) -> &mut [u8] {
		debug_assert_ne!(pointer, 0, "block pointer 0 is the null sentinel");
		self.block_mut(pointer)
	}

	/// Interprets data block `pointer` as a table of `POINTERS_PER_BLOCK` little-endian `u32`s.
	pub fn pointer_table(&self, pointer: u32) -> [u32; POINTERS_PER_BLOCK] {
		let bytes = self.data_block(pointer);
		let mut table = [0u32; POINTERS_PER_BLOCK];
		for (i, slot) in table.iter_mut().enumerate() {
			let off = i * 4;
			*slot = u32::from_le_bytes(bytes[off..off + 4].try_into().unwrap());
		}
		table
	}

	/// Writes one entry of a pointer-table block.
	pub fn set_pointer_table_entry(&mut self, pointer: u32, index: usize, value: u32) {
		let bytes = self.data_block_mut(pointer);
		let off = index * 4;
		bytes[off..off + 4].copy_from_slice(&value.to_le_bytes());
	}

	/// Zero-fills data block `pointer`.
	pub fn zero_block(&mut self, pointer: u32) {
		self.data_block_mut(pointer).fill(0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn init_reserves_metadata_blocks() {
		crate::init_test_logging();
		let disk = Disk::new(FsConfig::default());
		assert_eq!(disk.free_blocks(), (TOTAL_BLOCKS - METADATA_BLOCKS) as u32);
		assert_eq!(disk.free_inodes(), MAX_INODES as u32);
		for b in 0..METADATA_BLOCKS as u32 {
			assert!(!disk.bitmap_bit(b), "metadata block {b} must be allocated");
		}
		assert!(disk.bitmap_bit(METADATA_BLOCKS as u32), "first data block must be free");
	}

	#[test]
	fn root_inode_is_directory() {
		let disk = Disk::new(FsConfig::default());
		assert_eq!(disk.inode(0).kind, crate::inode::InodeKind::Directory);
	}

	#[test]
	fn inode_round_trip() {
		let mut disk = Disk::new(FsConfig::default());
		let mut inode = Inode::new(crate::inode::InodeKind::RegularFile);
		inode.size = 42;
		disk.set_inode(7, &inode);
		assert_eq!(disk.inode(7), inode);
	}

	#[test]
	fn pointer_table_round_trip() {
		let mut disk = Disk::new(FsConfig::default());
		let block = crate::bitmap::allocate(&mut disk).unwrap();
		disk.set_pointer_table_entry(block, 3, 999);
		assert_eq!(disk.pointer_table(block)[3], 999);
	}
}
