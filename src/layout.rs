//! Fixed on-disk geometry.
//!
//! Every value here is part of the external, bit-exact contract: the
//! addressing maths in [`crate::block_walker`] is derived from these at
//! compile time, so none of them is a runtime-configurable knob (see
//! [`crate::config::FsConfig`] for the handful of values that are).

/// Size in bytes of a single block.
pub const BLOCK_SIZE: usize = 256;

/// Total size in bytes of the disk.
pub const DISK_SIZE: usize = 2 * 1024 * 1024;

/// Total number of blocks on the disk.
pub const TOTAL_BLOCKS: usize = DISK_SIZE / BLOCK_SIZE;

/// Size in bytes of one on-disk inode record.
pub const INODE_SIZE: usize = 64;

/// Number of inode records packed into a single block.
pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / INODE_SIZE;

/// Number of blocks dedicated to the inode table.
pub const INODE_TABLE_BLOCKS: usize = 256;

/// Number of inodes addressable through the inode table (excludes the root,
/// which is embedded in the superblock as inode number 0).
pub const MAX_INODES: usize = INODE_TABLE_BLOCKS * INODES_PER_BLOCK;

/// Number of blocks dedicated to the allocation bitmap.
pub const BITMAP_BLOCKS: usize = 4;

/// Number of 4-byte block pointers that fit in one block.
pub const POINTERS_PER_BLOCK: usize = BLOCK_SIZE / 4;

/// Number of direct block pointers in an inode.
pub const DIRECT_POINTERS: usize = 8;

/// Total number of block pointer slots in an inode (`DIRECT_POINTERS` direct,
/// one single-indirect, one double-indirect).
pub const LOCATION_LEN: usize = DIRECT_POINTERS + 2;

/// Index of the single-indirect pointer within `Inode::location`.
pub const SINGLE_INDIRECT_INDEX: usize = DIRECT_POINTERS;

/// Index of the double-indirect pointer within `Inode::location`.
pub const DOUBLE_INDIRECT_INDEX: usize = DIRECT_POINTERS + 1;

/// Maximum number of data blocks addressable by a single inode.
pub const MAX_BLOCKS_PER_FILE: usize =
	DIRECT_POINTERS + POINTERS_PER_BLOCK + POINTERS_PER_BLOCK * POINTERS_PER_BLOCK;

/// Maximum size in bytes of a regular file.
pub const MAX_FILE_SIZE: u32 = (MAX_BLOCKS_PER_FILE * BLOCK_SIZE) as u32;

/// Size in bytes of one packed directory entry.
pub const DIR_ENTRY_SIZE: usize = 16;

/// Length of the `filename` field of a directory entry, including the NUL terminator slot.
pub const FILENAME_FIELD_LEN: usize = 14;

/// Maximum number of characters a filename may hold (one byte reserved as a terminator).
pub const FILENAME_MAX: usize = FILENAME_FIELD_LEN - 1;

/// Block index of the superblock.
pub const SUPERBLOCK_BLOCK: usize = 0;

/// First block index of the inode table (inclusive).
pub const INODE_TABLE_START: usize = SUPERBLOCK_BLOCK + 1;

/// One past the last block index of the inode table.
pub const INODE_TABLE_END: usize = INODE_TABLE_START + INODE_TABLE_BLOCKS;

/// First block index of the allocation bitmap (inclusive).
pub const BITMAP_START: usize = INODE_TABLE_END;

/// One past the last block index of the allocation bitmap.
pub const BITMAP_END: usize = BITMAP_START + BITMAP_BLOCKS;

/// First block index of the data-block pool (inclusive).
pub const DATA_START: usize = BITMAP_END;

/// Number of blocks consumed by filesystem metadata (superblock + inode table + bitmap).
pub const METADATA_BLOCKS: usize = DATA_START;

const _: () = assert!(TOTAL_BLOCKS == 8192);
const _: () = assert!(MAX_INODES == 1024);
const _: () = assert!(POINTERS_PER_BLOCK == 64);
const _: () = assert!(MAX_BLOCKS_PER_FILE == 4168);
const _: () = assert!(MAX_FILE_SIZE == 1_067_008);
const _: () = assert!(DATA_START == 261);
