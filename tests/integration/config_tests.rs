use dupesearch::config::{CliOverrides, Config, ConfigError};
use figment::providers::{Env, Serialized};
use figment::{Figment, Jail};
use std::path::{Path, PathBuf};

#[test]
fn test_default_path_ends_in_config_toml() {
    if let Some(path) = Config::default_path() {
        assert!(path.ends_with("config.toml"));
    }
}

#[test]
fn test_env_override() {
    Jail::expect_with(|jail| {
        jail.set_env("DUPESEARCH_IO_THREADS", "12");
        jail.set_env("DUPESEARCH_SAVE_PATH", "/tmp/dupes.json");

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("DUPESEARCH_"))
            .extract()?;

        assert_eq!(config.io_threads, 12);
        assert_eq!(config.save_path, Some(PathBuf::from("/tmp/dupes.json")));
        Ok(())
    });
}

#[test]
fn test_toml_file_loading() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            io_threads = 2
            refresh_interval_ms = 500
            save_path = "results/dupes.json"
            "#,
        )?;

        let config = Config::load(Some(Path::new("config.toml")), &CliOverrides::default())
            .map_err(|e| e.to_string())?;

        assert_eq!(config.io_threads, 2);
        assert_eq!(config.refresh_interval_ms, 500);
        assert_eq!(config.chunk_size, Config::default().chunk_size);
        assert_eq!(config.save_path, Some(PathBuf::from("results/dupes.json")));
        Ok(())
    });
}

#[test]
fn test_cli_beats_env_and_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "save_path = \"from-file.json\"")?;
        jail.set_env("DUPESEARCH_SAVE_PATH", "from-env.json");

        let overrides = CliOverrides {
            save_path: Some(PathBuf::from("from-cli.json")),
            ..CliOverrides::default()
        };
        let config = Config::load(Some(Path::new("config.toml")), &overrides)
            .map_err(|e| e.to_string())?;

        assert_eq!(config.save_path, Some(PathBuf::from("from-cli.json")));
        Ok(())
    });
}

#[test]
fn test_invalid_toml_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "io_threads = [not valid toml")?;
        let result = Config::load(Some(Path::new("config.toml")), &CliOverrides::default());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        Ok(())
    });
}

#[test]
fn test_zero_values_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("DUPESEARCH_CHUNK_SIZE", "0");
        let result = Config::load(None, &CliOverrides::default());
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "chunk_size",
                ..
            })
        ));
        Ok(())
    });
}
