//! Byte-level read/write/seek over a regular file's block tree.
//!
//! There is no page cache here (contrast the teacher's `read_page`/
//! `write_frame`, which fault pages in through `Ext2Fs`'s frame cache): every
//! call goes straight through [`crate::block_walker`] to the backing byte
//! buffer, since the whole disk already lives in memory.

use crate::block_walker;
use crate::disk::Disk;
use crate::error::{Error, Result};
use crate::inode::{Inode, InodeKind};
use crate::layout::{BLOCK_SIZE, MAX_FILE_SIZE};

fn require_regular(inode: &Inode) -> Result<()> {
	if inode.kind != InodeKind::RegularFile {
		return Err(Error::NotARegularFile);
	}
	Ok(())
}

/// Copies up to `dst.len()` bytes starting at `pos` into `dst`. Returns the
/// number of bytes actually copied, which is less than `dst.len()` at EOF or
/// when a hole in the file is reached.
pub fn read(disk: &Disk, inode: &Inode, pos: u32, dst: &mut [u8]) -> Result<usize> {
	require_regular(inode)?;
	if pos >= inode.size {
		return Ok(0);
	}
	let n = (dst.len() as u64).min((inode.size - pos) as u64) as usize;
	let mut copied = 0;
	while copied < n {
		let file_pos = pos as usize + copied;
		let logical = file_pos / BLOCK_SIZE;
		let in_block_off = file_pos % BLOCK_SIZE;
		let Some(block) = block_walker::translate(disk, inode, logical) else {
			break;
		};
		let chunk = (n - copied).min(BLOCK_SIZE - in_block_off);
		let block_bytes = disk.data_block(block);
		dst[copied..copied + chunk].copy_from_slice(&block_bytes[in_block_off..in_block_off + chunk]);
		copied += chunk;
	}
	Ok(copied)
}

/// Copies up to `src.len()` bytes from `src` into the file starting at
/// `pos`, allocating blocks on demand, then grows `inode.size` to cover what
/// was written. Returns the number of bytes actually copied, which is less
/// than `src.len()` only when the allocator runs out of space.
///
/// A write does not implicitly fill the gap before `pos` with allocated
/// blocks: only the blocks the written bytes fall into are materialised.
pub fn write(disk: &mut Disk, inode: &mut Inode, pos: u32, src: &[u8]) -> Result<usize> {
	require_regular(inode)?;
	let n = (src.len() as u64).min((MAX_FILE_SIZE.saturating_sub(pos)) as u64) as usize;
	let mut copied = 0;
	while copied < n {
		let file_pos = pos as usize + copied;
		let logical = file_pos / BLOCK_SIZE;
		let in_block_off = file_pos % BLOCK_SIZE;
		let Some(block) = block_walker::resolve(disk, inode, logical) else {
			break;
		};
		let chunk = (n - copied).min(BLOCK_SIZE - in_block_off);
		let block_bytes = disk.data_block_mut(block);
		block_bytes[in_block_off..in_block_off + chunk].copy_from_slice(&src[copied..copied + chunk]);
		copied += chunk;
	}
	inode.size = inode.size.max(pos + copied as u32);
	if copied < n {
		bitmap_exhausted_notice(disk);
	}
	Ok(copied)
}

fn bitmap_exhausted_notice(disk: &Disk) {
	crate::bitmap::log_exhausted(disk);
}

/// Clamps `offset` into `0..=inode.size` and returns it; the caller decides
/// whether to store the result as a session's position. `offset` is signed
/// so a negative seek clamps to 0 rather than wrapping.
pub fn lseek(inode: &Inode, offset: i64) -> Result<u32> {
	require_regular(inode)?;
	Ok(offset.clamp(0, inode.size as i64) as u32)
}
