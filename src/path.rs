//! Splits slash/backslash-separated paths and walks them down to a parent
//! directory inode.
//!
//! Collapsed from the teacher's `Path`/`Components` (which distinguish
//! `RootDir`/`CurDir`/`ParentDir`/`Normal` components and support `..`
//! traversal and owned `PathBuf`s): there is no current-working-directory
//! concept and no `.`/`..` handling here, so a path is nothing more than an
//! ordered list of name components relative to the root.

use crate::dir;
use crate::disk::Disk;
use crate::error::{Error, Result};
use crate::inode::InodeKind;

/// Inode number of the root directory.
pub const ROOT: u16 = 0;

fn is_separator(c: char) -> bool {
	c == '/' || c == '\\'
}

/// Splits `path` into its non-empty components, in order.
fn components(path: &str) -> impl Iterator<Item = &str> {
	path.split(is_separator).filter(|c| !c.is_empty())
}

/// The substring after the last separator. `None` for an empty path or `"/"`,
/// both of which name the root and so have no final component.
pub fn final_component(path: &str) -> Option<&str> {
	components(path).last()
}

/// Walks every component of `path` except the last, starting at the root,
/// failing if any intermediate component is missing or is not a directory.
/// Returns the inode number of the directory that would contain the final
/// component.
///
/// For an empty path or `"/"` this returns [`Error::NoSuchPath`]: the root
/// has no parent.
pub fn resolve_parent(disk: &Disk, path: &str) -> Result<u16> {
	let mut comps = components(path).peekable();
	if comps.peek().is_none() {
		return Err(Error::NoSuchPath);
	}
	let mut current = ROOT;
	while let Some(component) = comps.next() {
		if comps.peek().is_none() {
			// `component` is the final component; `current` already names its parent.
			break;
		}
		let inode = disk.inode(current);
		if inode.kind != InodeKind::Directory {
			return Err(Error::NotADirectory);
		}
		let (entry, _) = dir::lookup(disk, &inode, component).ok_or(Error::NoSuchPath)?;
		current = entry.inode_number;
	}
	if disk.inode(current).kind != InodeKind::Directory {
		return Err(Error::NotADirectory);
	}
	Ok(current)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::FsConfig;
	use crate::inode_table;

	#[test]
	fn final_component_of_root_is_none() {
		assert_eq!(final_component(""), None);
		assert_eq!(final_component("/"), None);
	}

	#[test]
	fn final_component_of_nested_path() {
		assert_eq!(final_component("/a/b/c"), Some("c"));
		assert_eq!(final_component("a\\b"), Some("b"));
	}

	#[test]
	fn resolve_parent_of_top_level_name_is_root() {
		let disk = Disk::new(FsConfig::default());
		assert_eq!(resolve_parent(&disk, "/file").unwrap(), ROOT);
	}

	#[test]
	fn resolve_parent_of_root_itself_fails() {
		let disk = Disk::new(FsConfig::default());
		assert!(matches!(resolve_parent(&disk, "/"), Err(Error::NoSuchPath)));
		assert!(matches!(resolve_parent(&disk, ""), Err(Error::NoSuchPath)));
	}

	#[test]
	fn resolve_parent_walks_nested_directories() {
		let mut disk = Disk::new(FsConfig::default());
		let sub_number = inode_table::allocate(&mut disk, InodeKind::Directory).unwrap();
		let mut root = disk.inode(ROOT);
		dir::insert(&mut disk, &mut root, dir::DirEntry::new("sub", sub_number).unwrap()).unwrap();
		disk.set_inode(ROOT, &root);

		assert_eq!(resolve_parent(&disk, "/sub/deeper").unwrap(), sub_number);
	}

	#[test]
	fn resolve_parent_fails_through_non_directory() {
		let mut disk = Disk::new(FsConfig::default());
		let file_number = inode_table::allocate(&mut disk, InodeKind::RegularFile).unwrap();
		let mut root = disk.inode(ROOT);
		dir::insert(&mut disk, &mut root, dir::DirEntry::new("file", file_number).unwrap()).unwrap();
		disk.set_inode(ROOT, &root);

		assert!(matches!(resolve_parent(&disk, "/file/inner"), Err(Error::NotADirectory)));
	}

	#[test]
	fn resolve_parent_fails_on_missing_component() {
		let disk = Disk::new(FsConfig::default());
		assert!(matches!(resolve_parent(&disk, "/missing/inner"), Err(Error::NoSuchPath)));
	}
}
