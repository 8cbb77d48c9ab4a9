use std::sync::Once;

/// Installs `env_logger` once for the whole integration test binary.
pub fn init_logging() {
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		let _ = env_logger::builder().is_test(true).try_init();
	});
}
