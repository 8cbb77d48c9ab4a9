mod common;

use proptest::prelude::*;
use ramdisk_fs::Filesystem;

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	/// Writing `buf` at offset `pos` and reading the same range back yields `buf`,
	/// for any offset/length that stays inside a single file's address space.
	#[test]
	fn write_then_read_round_trips(
		pos in 0u32..4096,
		buf in proptest::collection::vec(any::<u8>(), 0..2048),
	) {
		common::init_logging();
		let mut fs = Filesystem::new();
		fs.create("/p.bin").unwrap();
		let fd = fs.open("/p.bin").unwrap();
		fs.lseek(fd, pos as i64).unwrap();
		let written = fs.write(fd, &buf).unwrap();
		prop_assert_eq!(written, buf.len());

		fs.lseek(fd, pos as i64).unwrap();
		let mut out = vec![0u8; buf.len()];
		let read = fs.read(fd, &mut out).unwrap();
		prop_assert_eq!(read, buf.len());
		prop_assert_eq!(out, buf);
	}

	/// Any sequence of create/write/unlink on uniquely-named files returns the
	/// free block and inode counters to their starting values.
	#[test]
	fn create_write_unlink_conserves_free_counts(
		sizes in proptest::collection::vec(0usize..600, 1..8),
	) {
		common::init_logging();
		let mut fs = Filesystem::new();
		let blocks0 = fs.free_blocks();
		let inodes0 = fs.free_inodes();

		for (i, size) in sizes.iter().enumerate() {
			let path = format!("/c{i}");
			fs.create(&path).unwrap();
			let fd = fs.open(&path).unwrap();
			let data = vec![0xAAu8; *size];
			fs.write(fd, &data).unwrap();
			fs.close(fd).unwrap();
		}
		for i in 0..sizes.len() {
			fs.unlink(&format!("/c{i}")).unwrap();
		}

		prop_assert_eq!(fs.free_blocks(), blocks0);
		prop_assert_eq!(fs.free_inodes(), inodes0);
	}
}
