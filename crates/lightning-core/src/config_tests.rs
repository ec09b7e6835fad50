//! Tests for `config` module.

use std::io::Write;

use serial_test::serial;

use super::config::*;
use super::simd_native::Backend;

fn clear_env() {
    for key in [
        "LIGHTNING_KERNEL__FORCE_SCALAR",
        "LIGHTNING_BATCH__PARALLEL",
        "LIGHTNING_BATCH__PARALLEL_THRESHOLD",
        "LIGHTNING_BATCH__PREFETCH",
        "LIGHTNING_LOGGING__LEVEL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_defaults() {
    let config = EngineConfig::default();
    assert!(!config.kernel.force_scalar);
    assert!(config.batch.parallel);
    assert_eq!(config.batch.parallel_threshold, 256);
    assert!(config.batch.prefetch);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_backend_from_force_scalar() {
    let mut kernel = KernelConfig::default();
    assert_eq!(kernel.backend(), Backend::Auto);
    kernel.force_scalar = true;
    assert_eq!(kernel.backend(), Backend::Scalar);
}

#[test]
fn test_from_toml_str_partial_overrides() {
    let config = EngineConfig::from_toml_str(
        r#"
        [batch]
        parallel_threshold = 1024
        "#,
    )
    .unwrap();
    assert_eq!(config.batch.parallel_threshold, 1024);
    assert!(config.batch.parallel);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_from_toml_str_rejects_zero_threshold() {
    let err = EngineConfig::from_toml_str("[batch]\nparallel_threshold = 0\n").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "batch.parallel_threshold",
            ..
        }
    ));
}

#[test]
fn test_from_toml_str_rejects_unknown_level() {
    let err = EngineConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
    assert!(err.to_string().contains("logging.level"));
}

#[test]
fn test_from_toml_str_rejects_wrong_type() {
    let err = EngineConfig::from_toml_str("[kernel]\nforce_scalar = \"yes please\"\n");
    assert!(matches!(err, Err(ConfigError::Load(_))));
}

#[test]
fn test_level_check_is_case_insensitive() {
    let mut config = EngineConfig::default();
    config.logging.level = "DEBUG".to_string();
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_reads_env_overrides() {
    clear_env();
    std::env::set_var("LIGHTNING_KERNEL__FORCE_SCALAR", "true");
    std::env::set_var("LIGHTNING_BATCH__PARALLEL_THRESHOLD", "64");

    let config = EngineConfig::load().unwrap();
    assert!(config.kernel.force_scalar);
    assert_eq!(config.batch.parallel_threshold, 64);

    clear_env();
}

#[test]
#[serial]
fn test_load_from_file_then_env() {
    clear_env();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[batch]\nparallel = false\nparallel_threshold = 32\n\n[logging]\nlevel = \"debug\""
    )
    .unwrap();

    let config = EngineConfig::load_from(file.path()).unwrap();
    assert!(!config.batch.parallel);
    assert_eq!(config.batch.parallel_threshold, 32);
    assert_eq!(config.logging.level, "debug");

    std::env::set_var("LIGHTNING_BATCH__PARALLEL_THRESHOLD", "8");
    let config = EngineConfig::load_from(file.path()).unwrap();
    assert_eq!(config.batch.parallel_threshold, 8);
    assert!(!config.batch.parallel);

    clear_env();
}

#[test]
#[serial]
fn test_load_from_missing_file_uses_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::load_from(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, EngineConfig::default());
}
