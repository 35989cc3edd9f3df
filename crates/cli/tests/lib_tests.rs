//! Tests for lib.rs constants and default paths

use zenith_cli::{default_config_path, default_data_dir, APP_NAME, DEFAULT_CONFIG_FILE, DEFAULT_DATA_DIR};

#[test]
fn test_constants() {
    assert_eq!(APP_NAME, "zenith");
    assert_eq!(DEFAULT_CONFIG_FILE, "zenith.toml");
    assert_eq!(DEFAULT_DATA_DIR, ".zenith");
}

#[test]
fn test_default_paths() {
    assert!(default_data_dir().ends_with(DEFAULT_DATA_DIR));
    assert!(default_config_path().ends_with(DEFAULT_CONFIG_FILE));
}
