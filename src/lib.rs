//! An in-memory hierarchical filesystem layered over a fixed-size byte
//! region, structured as a classical superblock + inode table + block
//! bitmap + data pool, with direct/single-indirect/double-indirect block
//! addressing.
//!
//! There is no persistence across process restarts and no on-disk journal:
//! the whole image lives in one heap allocation for the life of a
//! [`Filesystem`]. The crate is organized bottom-up, mirroring how a real
//! filesystem driver layers a byte-addressable block device underneath an
//! allocator, an inode table, a block-tree walker, and finally the
//! directory/path/file-descriptor machinery a caller actually uses:
//!
//! - [`disk`] — the byte buffer and typed views over its four partitions.
//! - [`bitmap`] / [`inode_table`] — the two allocators.
//! - [`block_walker`] — translates a file-relative block index to a disk
//!   block, allocating indirection blocks lazily.
//! - [`file_io`] — byte-level read/write/seek built on the walker.
//! - [`dir`] — fixed-size directory entries and directory operations.
//! - [`path`] — splits paths and walks them down to a parent directory.
//! - [`fd`] — the client-side descriptor table.
//! - [`filesystem`] — [`Filesystem`], the façade tying all of the above together.

pub mod bitmap;
pub mod block_walker;
pub mod config;
pub mod dir;
pub mod disk;
pub mod error;
pub mod fd;
pub mod file_io;
pub mod filesystem;
pub mod inode;
pub mod inode_table;
pub mod layout;
pub mod path;
pub mod superblock;

pub use config::FsConfig;
pub use error::{Error, Result};
pub use filesystem::Filesystem;
pub use inode::{Inode, InodeKind};

/// Installs `env_logger` exactly once, so `RUST_LOG=trace cargo test --
/// --nocapture` surfaces this crate's diagnostics without every unit test
/// remembering to call `env_logger::init()` itself. Integration tests under
/// `tests/` use their own copy of this helper (`env_logger` is a
/// dev-dependency, unreachable from non-test builds of this crate).
#[cfg(test)]
pub(crate) fn init_test_logging() {
	use std::sync::Once;
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		let _ = env_logger::builder().is_test(true).try_init();
	});
}
