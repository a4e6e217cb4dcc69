use super::*;
use crate::chunking::SplitterConfig;
use tempfile::TempDir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().expect("can create temp dir");

    let config = Config::load(temp_dir.path()).expect("load should succeed");

    assert_eq!(config.chunking, SplitterConfig::default());
    assert_eq!(config.search, SearchConfig::default());
    assert_eq!(config.base_dir, temp_dir.path());
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("can create temp dir");

    let config = Config {
        chunking: SplitterConfig {
            chunk_size: 500,
            overlap: 50,
        },
        search: SearchConfig {
            default_top_k: 5,
            recommend_top_k: 3,
            sample_size: 10,
        },
        base_dir: temp_dir.path().to_path_buf(),
    };
    config.save().expect("save should succeed");

    let loaded = Config::load(temp_dir.path()).expect("load should succeed");

    assert_eq!(loaded, config);
}

#[test]
fn validate_rejects_small_chunk_size() {
    let config = Config {
        chunking: SplitterConfig {
            chunk_size: 10,
            overlap: 0,
        },
        ..Config::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidChunkSize(10))
    ));
}

#[test]
fn validate_rejects_overlap_at_least_chunk_size() {
    let config = Config {
        chunking: SplitterConfig {
            chunk_size: 300,
            overlap: 300,
        },
        ..Config::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OverlapTooLarge(300, 300))
    ));
}

#[test]
fn validate_rejects_zero_top_k() {
    let config = Config {
        search: SearchConfig {
            default_top_k: 0,
            ..SearchConfig::default()
        },
        ..Config::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTopK(0))
    ));
}

#[test]
fn invalid_config_file_fails_load() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[chunking]\nchunk_size = 50\noverlap = 0\n",
    )
    .expect("can write config");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
fn index_dir_is_under_base_dir() {
    let config = Config {
        base_dir: PathBuf::from("/tmp/example"),
        ..Config::default()
    };

    assert_eq!(config.index_dir_path(), PathBuf::from("/tmp/example/index"));
}
