//! The operation façade: the one type a caller actually holds.
//!
//! `Filesystem` wires the lower layers together the way the teacher's
//! syscall handlers wire `OpenFile` to `Ext2Fs`/`VFS`, but as a single
//! in-process struct rather than a syscall dispatch table: there is no
//! process table or VFS mountpoint graph here, just one disk and one
//! client's descriptor table.

use std::fmt;

use crate::block_walker;
use crate::config::FsConfig;
use crate::dir::{self, DirEntry};
use crate::disk::Disk;
use crate::error::{Error, Result};
use crate::fd::FdTable;
use crate::inode::InodeKind;
use crate::inode_table;
use crate::path;

/// The in-memory hierarchical filesystem.
///
/// Not `Sync`: a caller embedding this in a multi-threaded host wraps it in
/// `std::sync::Mutex` at the call boundary rather than relying on any
/// locking inside the crate (see the concurrency model notes on the
/// individual operations below).
pub struct Filesystem {
	disk: Disk,
	fds: FdTable,
}

fn log_result<T>(disk: &Disk, op: &str, detail: &dyn fmt::Display, result: Result<T>) -> Result<T> {
	if let Err(ref e) = result {
		log::debug!(target: disk.config().log_target, "{op}({detail}) failed: {e}");
	}
	result
}

impl Filesystem {
	/// Creates a filesystem over a freshly initialized disk, using default configuration.
	pub fn new() -> Self {
		Self::with_config(FsConfig::default())
	}

	/// Creates a filesystem over a freshly initialized disk with explicit configuration.
	pub fn with_config(config: FsConfig) -> Self {
		Self {
			disk: Disk::new(config),
			fds: FdTable::new(),
		}
	}

	/// Number of blocks still free, for diagnostics and tests.
	pub fn free_blocks(&self) -> u32 {
		self.disk.free_blocks()
	}

	/// Number of inode-table slots still free, for diagnostics and tests.
	pub fn free_inodes(&self) -> u32 {
		self.disk.free_inodes()
	}

	fn create_impl(&mut self, path: &str, kind: InodeKind) -> Result<u16> {
		let parent_number = path::resolve_parent(&self.disk, path)?;
		let name = path::final_component(path).ok_or(Error::BadArgument)?;
		let mut parent = self.disk.inode(parent_number);
		if dir::lookup(&self.disk, &parent, name).is_some() {
			return Err(Error::AlreadyExists);
		}
		let inode_number = inode_table::allocate(&mut self.disk, kind).ok_or(Error::NoSpace)?;
		let entry = DirEntry::new(name, inode_number)?;
		if let Err(e) = dir::insert(&mut self.disk, &mut parent, entry) {
			inode_table::free(&mut self.disk, inode_number);
			return Err(e);
		}
		self.disk.set_inode(parent_number, &parent);
		Ok(inode_number)
	}

	/// Creates a regular file at `path`. The parent must exist and be a
	/// directory, and `path`'s final component must not already exist there.
	pub fn create(&mut self, path: &str) -> Result<u16> {
		let result = self.create_impl(path, InodeKind::RegularFile);
		log_result(&self.disk, "create", &path, result)
	}

	/// Creates a directory at `path`. Identical preconditions to [`Self::create`].
	pub fn mkdir(&mut self, path: &str) -> Result<u16> {
		let result = self.create_impl(path, InodeKind::Directory);
		log_result(&self.disk, "mkdir", &path, result)
	}

	fn unlink_impl(&mut self, path: &str) -> Result<()> {
		if path::final_component(path).is_none() {
			return Err(Error::BadArgument);
		}
		let parent_number = path::resolve_parent(&self.disk, path)?;
		let name = path::final_component(path).ok_or(Error::BadArgument)?;
		let mut parent = self.disk.inode(parent_number);
		let (entry, _) = dir::lookup(&self.disk, &parent, name).ok_or(Error::NotFound)?;
		let target_number = entry.inode_number;
		let mut target = self.disk.inode(target_number);
		if target.kind == InodeKind::Directory && target.dir_entry_count != 0 {
			return Err(Error::DirectoryNotEmpty);
		}
		if target.open_count != 0 {
			return Err(Error::InUse);
		}
		block_walker::free_all(&mut self.disk, &mut target);
		inode_table::free(&mut self.disk, target_number);
		dir::remove(&mut self.disk, &mut parent, name)?;
		if parent.kind == InodeKind::Directory && parent.dir_entry_count == 0 {
			block_walker::free_all(&mut self.disk, &mut parent);
		}
		self.disk.set_inode(parent_number, &parent);
		Ok(())
	}

	/// Removes the file or empty directory at `path`.
	///
	/// Refuses `""`/`"/"`. If the target is a directory, it must be empty. If
	/// the target has any open session, refuses with [`Error::InUse`]. When
	/// the parent directory's last entry is removed, its storage is freed
	/// immediately, not only when the parent itself is unlinked.
	pub fn unlink(&mut self, path: &str) -> Result<()> {
		let result = self.unlink_impl(path);
		log_result(&self.disk, "unlink", &path, result)
	}

	fn resolve_inode_number(&self, path: &str) -> Result<u16> {
		if path.is_empty() || path == "/" {
			return Ok(path::ROOT);
		}
		let parent_number = path::resolve_parent(&self.disk, path)?;
		let name = path::final_component(path).ok_or(Error::BadArgument)?;
		let parent = self.disk.inode(parent_number);
		dir::lookup(&self.disk, &parent, name).map(|(e, _)| e.inode_number).ok_or(Error::NotFound)
	}

	fn open_impl(&mut self, path: &str) -> Result<u32> {
		let inode_number = self.resolve_inode_number(path)?;
		let mut inode = self.disk.inode(inode_number);
		inode.open_count += 1;
		self.disk.set_inode(inode_number, &inode);
		Ok(self.fds.open(inode_number))
	}

	/// Opens `path` (the root if `path` is `""` or `"/"`) and returns a fresh
	/// descriptor positioned at offset 0. Increments the target inode's
	/// `open_count`.
	pub fn open(&mut self, path: &str) -> Result<u32> {
		let result = self.open_impl(path);
		log_result(&self.disk, "open", &path, result)
	}

	fn close_impl(&mut self, fd: u32) -> Result<()> {
		let session = self.fds.get(fd)?;
		self.fds.close(fd)?;
		let mut inode = self.disk.inode(session.inode_number);
		inode.open_count = inode.open_count.saturating_sub(1);
		self.disk.set_inode(session.inode_number, &inode);
		Ok(())
	}

	/// Closes `fd`, decrementing its inode's `open_count` (floored at 0).
	pub fn close(&mut self, fd: u32) -> Result<()> {
		let result = self.close_impl(fd);
		log_result(&self.disk, "close", &fd, result)
	}

	fn read_impl(&mut self, fd: u32, dst: &mut [u8]) -> Result<usize> {
		let session = self.fds.get(fd)?;
		let inode = self.disk.inode(session.inode_number);
		let n = crate::file_io::read(&self.disk, &inode, session.position, dst)?;
		self.fds.set_position(fd, session.position + n as u32)?;
		Ok(n)
	}

	/// Reads into `dst` from `fd`'s current position, advancing it by the
	/// number of bytes actually read.
	pub fn read(&mut self, fd: u32, dst: &mut [u8]) -> Result<usize> {
		let result = self.read_impl(fd, dst);
		log_result(&self.disk, "read", &fd, result)
	}

	fn write_impl(&mut self, fd: u32, src: &[u8]) -> Result<usize> {
		let session = self.fds.get(fd)?;
		let mut inode = self.disk.inode(session.inode_number);
		let n = crate::file_io::write(&mut self.disk, &mut inode, session.position, src)?;
		self.disk.set_inode(session.inode_number, &inode);
		self.fds.set_position(fd, session.position + n as u32)?;
		Ok(n)
	}

	/// Writes `src` at `fd`'s current position, advancing it by the number
	/// of bytes actually written and growing the file's reported size.
	pub fn write(&mut self, fd: u32, src: &[u8]) -> Result<usize> {
		let result = self.write_impl(fd, src);
		log_result(&self.disk, "write", &fd, result)
	}

	fn lseek_impl(&mut self, fd: u32, offset: i64) -> Result<u32> {
		let session = self.fds.get(fd)?;
		let inode = self.disk.inode(session.inode_number);
		let new_pos = crate::file_io::lseek(&inode, offset)?;
		self.fds.set_position(fd, new_pos)?;
		Ok(new_pos)
	}

	/// Sets `fd`'s position to `offset` clamped into `0..=size`.
	pub fn lseek(&mut self, fd: u32, offset: i64) -> Result<u32> {
		let result = self.lseek_impl(fd, offset);
		log_result(&self.disk, "lseek", &fd, result)
	}

	fn readdir_impl(&mut self, fd: u32) -> Result<Option<DirEntry>> {
		let session = self.fds.get(fd)?;
		let inode = self.disk.inode(session.inode_number);
		if inode.kind != InodeKind::Directory {
			return Err(Error::NotADirectory);
		}
		match dir::iterate_from(&self.disk, &inode, session.position) {
			Some((entry, next)) => {
				self.fds.set_position(fd, next)?;
				Ok(Some(entry))
			}
			None => Ok(None),
		}
	}

	/// Returns the next live entry in the directory `fd` was opened on,
	/// advancing its position past it. `None` at the end.
	///
	/// The position is a raw byte offset into the directory's entry array,
	/// not an opaque cursor: a caller holding a stale position across
	/// concurrent inserts/removals on the same directory may skip an entry
	/// that landed in a tombstone created after the position was captured.
	pub fn readdir(&mut self, fd: u32) -> Result<Option<DirEntry>> {
		let result = self.readdir_impl(fd);
		log_result(&self.disk, "readdir", &fd, result)
	}
}

impl Default for Filesystem {
	fn default() -> Self {
		Self::new()
	}
}
