//! The on-disk inode record and its kind tag.
//!
//! An inode is a fixed 64-byte record; [`Inode::to_bytes`] / [`Inode::from_bytes`]
//! implement the bit-exact layout from the specification's data model. There is
//! no derive macro doing the byte reinterpretation (the teacher's `AnyRepr`
//! derive lives in a proc-macro crate whose source was not available to adapt);
//! instead the struct is converted to/from its packed representation by hand,
//! the same way `mkfs`'s `Superblock` is poked field-by-field into a byte buffer.

use crate::layout::{DIRECT_POINTERS, DOUBLE_INDIRECT_INDEX, LOCATION_LEN, SINGLE_INDIRECT_INDEX};

/// Size in bytes of one packed inode record.
pub const SIZE: usize = 64;

/// What an inode slot currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InodeKind {
	/// The slot is unused.
	#[default]
	Empty,
	/// The inode describes a regular file.
	RegularFile,
	/// The inode describes a directory.
	Directory,
}

impl InodeKind {
	const TAG_EMPTY: [u8; 4] = *b"\0\0\0\0";
	const TAG_REGULAR: [u8; 4] = *b"reg\0";
	const TAG_DIRECTORY: [u8; 4] = *b"dir\0";

	fn to_tag(self) -> [u8; 4] {
		match self {
			InodeKind::Empty => Self::TAG_EMPTY,
			InodeKind::RegularFile => Self::TAG_REGULAR,
			InodeKind::Directory => Self::TAG_DIRECTORY,
		}
	}

	fn from_tag(tag: [u8; 4]) -> Self {
		match tag {
			Self::TAG_REGULAR => InodeKind::RegularFile,
			Self::TAG_DIRECTORY => InodeKind::Directory,
			_ => InodeKind::Empty,
		}
	}
}

/// A single inode record: either a free slot, a regular file, or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inode {
	/// What the slot currently holds.
	pub kind: InodeKind,
	/// Byte size of the file, or `dir_entry_count * DIR_ENTRY_SIZE` for a directory.
	pub size: u32,
	/// Block pointers: `[0..8)` direct, `[8]` single-indirect, `[9]` double-indirect.
	/// `0` means "not allocated".
	pub location: [u32; LOCATION_LEN],
	/// Number of live (non-tombstone) directory entries. Meaningful for directories only.
	pub dir_entry_count: u32,
	/// Number of extant `open` sessions referencing this inode.
	pub open_count: u32,
}

impl Default for Inode {
	fn default() -> Self {
		Self {
			kind: InodeKind::Empty,
			size: 0,
			location: [0; LOCATION_LEN],
			dir_entry_count: 0,
			open_count: 0,
		}
	}
}

impl Inode {
	/// Creates a freshly allocated inode of the given kind with all other fields zeroed.
	pub fn new(kind: InodeKind) -> Self {
		Self {
			kind,
			..Default::default()
		}
	}

	/// Direct pointer at `index` (`0..DIRECT_POINTERS`).
	pub fn direct(&self, index: usize) -> u32 {
		self.location[index]
	}

	/// The single-indirect pointer.
	pub fn single_indirect(&self) -> u32 {
		self.location[SINGLE_INDIRECT_INDEX]
	}

	/// The double-indirect pointer.
	pub fn double_indirect(&self) -> u32 {
		self.location[DOUBLE_INDIRECT_INDEX]
	}

	/// Serializes the inode into its packed 64-byte on-disk form.
	pub fn to_bytes(&self) -> [u8; SIZE] {
		let mut buf = [0u8; SIZE];
		buf[0..4].copy_from_slice(&self.kind.to_tag());
		buf[4..8].copy_from_slice(&self.size.to_le_bytes());
		for (i, ptr) in self.location.iter().enumerate() {
			let off = 8 + i * 4;
			buf[off..off + 4].copy_from_slice(&ptr.to_le_bytes());
		}
		let tail = 8 + LOCATION_LEN * 4;
		buf[tail..tail + 4].copy_from_slice(&self.dir_entry_count.to_le_bytes());
		buf[tail + 4..tail + 8].copy_from_slice(&self.open_count.to_le_bytes());
		debug_assert_eq!(tail + 8 + 8, SIZE); // remaining bytes are reserved padding, left zero
		buf
	}

	/// Parses a packed 64-byte on-disk inode record.
	pub fn from_bytes(buf: &[u8; SIZE]) -> Self {
		let mut tag = [0u8; 4];
		tag.copy_from_slice(&buf[0..4]);
		let kind = InodeKind::from_tag(tag);
		let size = u32::from_le_bytes(buf[4..8].try_into().unwrap());
		let mut location = [0u32; LOCATION_LEN];
		for (i, slot) in location.iter_mut().enumerate() {
			let off = 8 + i * 4;
			*slot = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
		}
		let tail = 8 + LOCATION_LEN * 4;
		let dir_entry_count = u32::from_le_bytes(buf[tail..tail + 4].try_into().unwrap());
		let open_count = u32::from_le_bytes(buf[tail + 4..tail + 8].try_into().unwrap());
		Self {
			kind,
			size,
			location,
			dir_entry_count,
			open_count,
		}
	}
}

const _: () = assert!(SIZE == 64);
const _: () = assert!(DIRECT_POINTERS == 8);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trip_empty() {
		let inode = Inode::default();
		assert_eq!(Inode::from_bytes(&inode.to_bytes()), inode);
	}

	#[test]
	fn round_trip_populated() {
		let mut inode = Inode::new(InodeKind::RegularFile);
		inode.size = 12345;
		inode.location[0] = 300;
		inode.location[9] = 8000;
		inode.open_count = 2;
		assert_eq!(Inode::from_bytes(&inode.to_bytes()), inode);
	}

	#[test]
	fn kind_tags_round_trip() {
		for kind in [InodeKind::Empty, InodeKind::RegularFile, InodeKind::Directory] {
			let inode = Inode::new(kind);
			assert_eq!(Inode::from_bytes(&inode.to_bytes()).kind, kind);
		}
	}
}
