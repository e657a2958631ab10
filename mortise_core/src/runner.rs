use std::num::NonZeroU32;

#[cfg(feature = "config")]
use crate::config::Config;
use crate::error::Kind;
use crate::traits::DEFAULT_MIGRATION_TABLE_NAME;
use crate::{Error, Migrate, Migration};

/// An enum that represents the target version up to which mortise should migrate.
/// It is used by [Runner].
#[derive(Clone, Copy, Debug)]
pub enum Target {
    Latest,
    Version(i64),
    Fake,
    FakeVersion(i64),
}

/// An enum that represents which applied migrations [Runner::rollback] reverts.
#[derive(Clone, Copy, Debug)]
pub enum RollbackTarget {
    /// Revert the last `n` applied migrations
    Count(NonZeroU32),
    /// Revert every applied migration newer than the given version
    Version(i64),
    All,
}

impl RollbackTarget {
    // applied migrations come in ascending order, the selection is returned newest first
    fn select(self, mut applied: Vec<Migration>) -> Vec<Migration> {
        applied.reverse();
        match self {
            RollbackTarget::Count(count) => {
                applied.truncate(count.get() as usize);
                applied
            }
            RollbackTarget::Version(version) => applied
                .into_iter()
                .take_while(|m| m.version() > version)
                .collect(),
            RollbackTarget::All => applied,
        }
    }
}

/// What to do when a column a migration adds already exists, or a column it drops is gone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum ColumnPolicy {
    /// Fail with [`Kind::ColumnAlreadyExists`] or [`Kind::ColumnNotFound`]
    #[default]
    Strict,
    /// Log a warning and skip the change
    Lenient,
}

impl ColumnPolicy {
    pub(crate) fn check(self, kind: Kind) -> Result<(), Error> {
        match self {
            ColumnPolicy::Strict => Err(Error::new(kind, None)),
            ColumnPolicy::Lenient => {
                log::warn!("{}, skipping", kind);
                Ok(())
            }
        }
    }
}

/// Struct that represents the report of the migration cycle.
/// A `Report` instance is returned by the [`Runner::run`] and [`Runner::rollback`] methods
/// via [`Result`]`<Report, Error>`. If there is an [`Error`] during a migration, you can access
/// the `Report` with [`Error::report`].
#[derive(Clone, Debug)]
pub struct Report {
    applied_migrations: Vec<Migration>,
    reverted_migrations: Vec<Migration>,
}

impl Report {
    /// Instantiate a new Report
    pub(crate) fn new(
        applied_migrations: Vec<Migration>,
        reverted_migrations: Vec<Migration>,
    ) -> Report {
        Report {
            applied_migrations,
            reverted_migrations,
        }
    }

    /// Retrieves the list of applied `Migration` of the migration cycle
    pub fn applied_migrations(&self) -> &Vec<Migration> {
        &self.applied_migrations
    }

    /// Retrieves the list of reverted `Migration` of the rollback cycle, newest first
    pub fn reverted_migrations(&self) -> &Vec<Migration> {
        &self.reverted_migrations
    }
}

/// Struct that represents the entrypoint to run the migrations.
pub struct Runner {
    abort_divergent: bool,
    abort_missing: bool,
    column_policy: ColumnPolicy,
    migrations: Vec<Migration>,
    target: Target,
    rollback_target: RollbackTarget,
    migration_table_name: String,
}

impl Runner {
    /// instantiate a new Runner
    pub fn new(migrations: &[Migration]) -> Runner {
        Runner {
            target: Target::Latest,
            rollback_target: RollbackTarget::Count(NonZeroU32::MIN),
            abort_divergent: true,
            abort_missing: true,
            column_policy: ColumnPolicy::Strict,
            migrations: migrations.to_vec(),
            migration_table_name: DEFAULT_MIGRATION_TABLE_NAME.into(),
        }
    }

    /// Apply the settings of a [`Config`] on top of this Runner.
    /// Fails with [`Kind::ConfigError`] if the config names an empty schema history table.
    #[cfg(feature = "config")]
    pub fn with_config(mut self, config: &Config) -> Result<Runner, Error> {
        if config.table_name().is_empty() {
            return Err(Error::new(
                Kind::ConfigError("field table_name must not be empty".into()),
                None,
            ));
        }

        self.set_migration_table_name(config.table_name());
        Ok(Runner {
            abort_divergent: config.abort_divergent(),
            abort_missing: config.abort_missing(),
            column_policy: config.column_policy(),
            ..self
        })
    }

    /// Get the gathered migrations.
    pub fn get_migrations(&self) -> &Vec<Migration> {
        &self.migrations
    }

    /// Set the target version up to which mortise should migrate, Latest migrates to the latest version available
    /// Version migrates to a user provided version, a Version with a higher version than the latest will be ignored,
    /// and Fake doesn't actually run any migration, just creates and updates mortise's schema history table
    /// by default this is set to Latest
    pub fn set_target(self, target: Target) -> Runner {
        Runner { target, ..self }
    }

    /// Set which applied migrations [Runner::rollback] reverts, by default the last one.
    pub fn set_rollback_target(self, rollback_target: RollbackTarget) -> Runner {
        Runner {
            rollback_target,
            ..self
        }
    }

    /// Set how a migration that adds an existing column or drops a missing one is handled.
    /// By default this is [`ColumnPolicy::Strict`].
    pub fn set_column_policy(self, column_policy: ColumnPolicy) -> Runner {
        Runner {
            column_policy,
            ..self
        }
    }

    /// Set true if migration process should abort if divergent migrations are found
    /// i.e. applied migrations with the same version but different name or checksum from the known ones.
    /// By default this is set to true.
    pub fn set_abort_divergent(self, abort_divergent: bool) -> Runner {
        Runner {
            abort_divergent,
            ..self
        }
    }

    /// Set true if migration process should abort if missing migrations are found
    /// i.e. applied migrations that are not known to the Runner,
    /// or known migrations with a version inferior to the last one applied but not applied.
    /// By default this is set to true.
    pub fn set_abort_missing(self, abort_missing: bool) -> Runner {
        Runner {
            abort_missing,
            ..self
        }
    }

    /// Queries the database for the last applied migration, returns None if there aren't applied Migrations
    pub fn get_last_applied_migration<C>(&self, conn: &'_ mut C) -> Result<Option<Migration>, Error>
    where
        C: Migrate,
    {
        Migrate::assert_migrations_table(conn, &self.migration_table_name)?;
        Migrate::get_last_applied_migration(conn, &self.migration_table_name)
    }

    /// Queries the database for all previous applied migrations
    pub fn get_applied_migrations<C>(&self, conn: &'_ mut C) -> Result<Vec<Migration>, Error>
    where
        C: Migrate,
    {
        Migrate::assert_migrations_table(conn, &self.migration_table_name)?;
        Migrate::get_applied_migrations(conn, &self.migration_table_name)
    }

    /// Set the table name to use for the migrations table. The default name is `mortise_schema_history`
    ///
    /// ### Warning
    /// Changing this can be disastrous for your database. You should verify that the migrations table has the same
    /// name as the name you specify here, if this is changed on an existing project.
    ///
    /// # Panics
    ///
    /// If the provided `migration_table_name` is empty
    pub fn set_migration_table_name<S: AsRef<str>>(
        &mut self,
        migration_table_name: S,
    ) -> &mut Self {
        if migration_table_name.as_ref().is_empty() {
            panic!("Migration table name must not be empty");
        }

        self.migration_table_name = migration_table_name.as_ref().to_string();
        self
    }

    /// Runs the Migrations in the supplied database connection
    pub fn run<C>(&self, connection: &mut C) -> Result<Report, Error>
    where
        C: Migrate,
    {
        Migrate::migrate(
            connection,
            &self.migrations,
            self.abort_divergent,
            self.abort_missing,
            self.column_policy,
            self.target,
            &self.migration_table_name,
        )
    }

    /// Reverts applied Migrations in the supplied database connection according to the rollback target
    pub fn rollback<C>(&self, connection: &mut C) -> Result<Report, Error>
    where
        C: Migrate,
    {
        let rollback_target = self.rollback_target;
        Migrate::rollback(
            connection,
            &self.migrations,
            self.abort_divergent,
            self.column_policy,
            |applied| rollback_target.select(applied),
            &self.migration_table_name,
        )
    }
}
