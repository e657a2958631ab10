use crate::error::Kind;
use crate::traits::DEFAULT_MIGRATION_TABLE_NAME;
use crate::{ColumnPolicy, Error};

use serde::{Deserialize, Serialize};
use std::path::Path;

// mortise config file, read with [`Config::from_file_location`] and applied with `Runner::with_config`
//
// [migrations]
// table_name = "mortise_schema_history"
// column_policy = "strict"
// abort_divergent = true
// abort_missing = true
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    migrations: Migrations,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
struct Migrations {
    table_name: String,
    column_policy: ColumnPolicy,
    abort_divergent: bool,
    abort_missing: bool,
}

impl Default for Migrations {
    fn default() -> Migrations {
        Migrations {
            table_name: DEFAULT_MIGRATION_TABLE_NAME.into(),
            column_policy: ColumnPolicy::Strict,
            abort_divergent: true,
            abort_missing: true,
        }
    }
}

impl Config {
    /// create a new config instance with the default settings
    pub fn new() -> Config {
        Config::default()
    }

    /// create a new Config instance from a config file located on the file system
    pub fn from_file_location<T: AsRef<Path>>(location: T) -> Result<Config, Error> {
        let file = std::fs::read_to_string(&location).map_err(|err| {
            Error::new(
                Kind::ConfigError(format!("could not open config file, {}", err)),
                None,
            )
        })?;

        let config: Config = toml::from_str(&file).map_err(|err| {
            Error::new(
                Kind::ConfigError(format!("could not parse config file, {}", err)),
                None,
            )
        })?;

        if config.migrations.table_name.is_empty() {
            return Err(Error::new(
                Kind::ConfigError("field table_name must not be empty".into()),
                None,
            ));
        }

        Ok(config)
    }

    pub fn table_name(&self) -> &str {
        &self.migrations.table_name
    }

    pub fn column_policy(&self) -> ColumnPolicy {
        self.migrations.column_policy
    }

    pub fn abort_divergent(&self) -> bool {
        self.migrations.abort_divergent
    }

    pub fn abort_missing(&self) -> bool {
        self.migrations.abort_missing
    }

    pub fn set_table_name(self, table_name: &str) -> Config {
        Config {
            migrations: Migrations {
                table_name: table_name.into(),
                ..self.migrations
            },
        }
    }

    pub fn set_column_policy(self, column_policy: ColumnPolicy) -> Config {
        Config {
            migrations: Migrations {
                column_policy,
                ..self.migrations
            },
        }
    }

    pub fn set_abort_divergent(self, abort_divergent: bool) -> Config {
        Config {
            migrations: Migrations {
                abort_divergent,
                ..self.migrations
            },
        }
    }

    pub fn set_abort_missing(self, abort_missing: bool) -> Config {
        Config {
            migrations: Migrations {
                abort_missing,
                ..self.migrations
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Kind};
    use crate::ColumnPolicy;
    use std::io::Write;

    #[test]
    fn returns_config_error_from_invalid_config_location() {
        let config = Config::from_file_location("invalid_path").unwrap_err();
        match config.kind() {
            Kind::ConfigError(msg) => assert!(msg.contains("could not open config file")),
            _ => panic!("test failed"),
        }
    }

    #[test]
    fn returns_config_error_from_invalid_toml_file() {
        let config = "[<$%
                     column_policy = \"strict\" \n";

        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        config_file.write_all(config.as_bytes()).unwrap();
        let config = Config::from_file_location(config_file.path()).unwrap_err();
        match config.kind() {
            Kind::ConfigError(msg) => assert!(msg.contains("could not parse config file")),
            _ => panic!("test failed"),
        }
    }

    #[test]
    fn returns_config_error_from_unknown_column_policy() {
        let config = "[migrations] \n
                     column_policy = \"sloppy\" \n";

        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        config_file.write_all(config.as_bytes()).unwrap();
        let config = Config::from_file_location(config_file.path()).unwrap_err();
        match config.kind() {
            Kind::ConfigError(msg) => assert!(msg.contains("could not parse config file")),
            _ => panic!("test failed"),
        }
    }

    #[test]
    fn returns_config_error_from_empty_table_name() {
        let config = "[migrations] \n
                     table_name = \"\" \n";

        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        config_file.write_all(config.as_bytes()).unwrap();
        let config = Config::from_file_location(config_file.path()).unwrap_err();
        match config.kind() {
            Kind::ConfigError(msg) => assert_eq!("field table_name must not be empty", msg),
            _ => panic!("test failed"),
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = "[migrations] \n
                     column_policy = \"lenient\" \n";

        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        config_file.write_all(config.as_bytes()).unwrap();
        let config = Config::from_file_location(config_file.path()).unwrap();
        assert_eq!(ColumnPolicy::Lenient, config.column_policy());
        assert_eq!("mortise_schema_history", config.table_name());
        assert!(config.abort_divergent());
        assert!(config.abort_missing());
    }

    #[test]
    fn empty_file_is_the_default_config() {
        let config_file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::from_file_location(config_file.path()).unwrap();
        assert_eq!(Config::new(), config);
    }

    #[test]
    fn setters_override_settings() {
        let config = Config::new()
            .set_table_name("claims_schema_history")
            .set_column_policy(ColumnPolicy::Lenient)
            .set_abort_divergent(false)
            .set_abort_missing(false);
        assert_eq!("claims_schema_history", config.table_name());
        assert_eq!(ColumnPolicy::Lenient, config.column_policy());
        assert!(!config.abort_divergent());
        assert!(!config.abort_missing());
    }

    #[test]
    fn serializes_to_toml() {
        let config = Config::new().set_column_policy(ColumnPolicy::Lenient);
        let s = toml::to_string(&config).unwrap();
        assert!(s.contains("column_policy = \"lenient\""));
        assert_eq!(config, toml::from_str::<Config>(&s).unwrap());
    }
}
