//! Error kinds returned by the filesystem's public operations.

use thiserror::Error;

/// Every way a public operation can fail.
///
/// Partial success (a `write` that stores fewer bytes than requested) is not
/// modelled as an error: size-returning operations return the count actually
/// performed and reserve `Err` for outright failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// A non-final path component does not exist, or exists but is not a directory.
	#[error("no such path")]
	NoSuchPath,
	/// The final path component does not exist in its parent directory.
	#[error("no such file or directory")]
	NotFound,
	/// `create`/`mkdir` target already exists.
	#[error("file already exists")]
	AlreadyExists,
	/// The operation requires a directory but the inode is not one.
	#[error("not a directory")]
	NotADirectory,
	/// The operation requires a regular file but the inode is not one.
	#[error("not a regular file")]
	NotARegularFile,
	/// `unlink` on a directory whose `dir_entry_count` is not zero.
	#[error("directory not empty")]
	DirectoryNotEmpty,
	/// `unlink` on an inode with `open_count > 0`.
	#[error("resource busy")]
	InUse,
	/// The bitmap or the inode table is exhausted.
	#[error("no space left")]
	NoSpace,
	/// The operation would grow a file beyond `MAX_FILE_SIZE`.
	#[error("file too large")]
	Oversize,
	/// A client-side file descriptor does not name an open session.
	#[error("bad file descriptor")]
	BadDescriptor,
	/// A malformed argument (empty path where one is required, root unlink, ...).
	#[error("bad argument")]
	BadArgument,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
