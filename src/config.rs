//! The small, non-normative tuning surface.
//!
//! Nothing here may change the on-disk layout in [`crate::layout`]: those
//! constants are baked into the addressing maths at compile time. `FsConfig`
//! only controls incidental behaviour that is invisible to a client observing
//! the operations in the façade, with one exception noted on `zero_on_alloc`.

/// Tunable knobs accepted by [`crate::Filesystem::with_config`].
#[derive(Debug, Clone)]
pub struct FsConfig {
	/// When `true`, every block handed out by the allocator (not just the ones
	/// explicitly requested zeroed, such as indirection blocks) is zero-filled
	/// before use. This is a defensive aid for tests asserting that stale bytes
	/// from a previous tenant never leak through a free/reallocate cycle; a
	/// correct caller never observes a difference either way, since `size` never
	/// exposes bytes beyond what was actually written.
	pub zero_on_alloc: bool,
	/// The `log` target string used by every diagnostic this crate emits, so an
	/// embedding application can filter or route them independently of its own.
	pub log_target: &'static str,
}

impl Default for FsConfig {
	fn default() -> Self {
		Self {
			zero_on_alloc: false,
			log_target: "ramdisk_fs",
		}
	}
}
