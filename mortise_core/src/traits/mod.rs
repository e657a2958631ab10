pub mod sync;

use time::format_description::well_known::Rfc3339;

use crate::error::WrapMigrationError;
use crate::{error::Kind, Error, Migration};

// Verifies applied and to be applied migrations returning Error if:
// - `abort_divergent` is true and there are applied migrations with a different name and checksum but same version as a known migration.
// - `abort_missing` is true and there are applied migrations that are not known, or known migrations older than the current version that were never applied
// - there are repeated migrations with the same version to be applied
pub(crate) fn verify_migrations(
    applied: Vec<Migration>,
    mut migrations: Vec<Migration>,
    abort_divergent: bool,
    abort_missing: bool,
) -> Result<Vec<Migration>, Error> {
    migrations.sort();

    for app in applied.iter() {
        // iterate applied migrations on database and assert all migrations
        // applied on database are known and have the same checksum
        match migrations.iter().find(|m| m.version() == app.version()) {
            None => {
                if abort_missing {
                    return Err(Error::new(Kind::MissingVersion(app.clone()), None));
                } else {
                    log::error!(target: "mortise_core::traits::missing", "migration {} is missing from the known migrations", app);
                }
            }
            Some(migration) => {
                if migration != app {
                    if abort_divergent {
                        return Err(Error::new(
                            Kind::DivergentVersion(app.clone(), migration.clone()),
                            None,
                        ));
                    } else {
                        log::error!(
                            target: "mortise_core::traits::divergent",
                            "applied migration {} is different than the known one {}",
                            app,
                            migration
                        );
                    }
                }
            }
        }
    }

    let current: Option<i64> = match applied.last() {
        Some(last) => {
            log::info!("current version: {}", last.version());
            Some(last.version())
        }
        None => {
            log::info!("schema history table is empty, going to apply all migrations");
            None
        }
    };

    let mut to_be_applied: Vec<Migration> = Vec::new();
    // iterate all known migrations and assert that there are not migrations missing:
    // migrations which its version is inferior to the current version on the database, yet were not applied.
    // select to be applied all migrations with version greater than current
    for migration in migrations.into_iter() {
        if !applied
            .iter()
            .any(|app| app.version() == migration.version())
        {
            if to_be_applied
                .iter()
                .any(|m| m.version() == migration.version())
            {
                return Err(Error::new(Kind::RepeatedVersion(migration), None));
            } else if current.is_some_and(|current| current >= migration.version()) {
                if abort_missing {
                    return Err(Error::new(Kind::MissingVersion(migration), None));
                } else {
                    log::error!(target: "mortise_core::traits::missing", "found migration {} older than the current version that was never applied", migration);
                }
            } else {
                to_be_applied.push(migration);
            }
        }
    }
    // with these two iterations we both assert that all migrations found on the database
    // are known and have the same checksum, and all known migrations
    // are either on the database, or greater than the current, and therefore going to be applied
    Ok(to_be_applied)
}

pub(crate) fn insert_migration_query(
    migration: &Migration,
    migration_table_name: &str,
) -> Result<String, Error> {
    let applied_on = migration
        .applied_on()
        .map(|applied_on| applied_on.format(&Rfc3339))
        .transpose()
        .migration_err("error formatting the applied_on timestamp", None)?
        .unwrap_or_default();

    Ok(format!(
        "INSERT INTO {} (version, name, applied_on, checksum) VALUES ({}, '{}', '{}', '{}')",
        migration_table_name,
        migration.version(),
        migration.name(),
        applied_on,
        migration.checksum()
    ))
}

pub(crate) fn delete_migration_query(migration: &Migration, migration_table_name: &str) -> String {
    format!(
        "DELETE FROM {} WHERE version = {}",
        migration_table_name,
        migration.version()
    )
}

pub(crate) const ASSERT_MIGRATIONS_TABLE_QUERY: &str =
    "CREATE TABLE IF NOT EXISTS %MIGRATION_TABLE_NAME%(
             version BIGINT PRIMARY KEY,
             name VARCHAR(255),
             applied_on VARCHAR(255),
             checksum VARCHAR(255));";

pub(crate) const GET_APPLIED_MIGRATIONS_QUERY: &str = "SELECT version, name, applied_on, checksum \
    FROM %MIGRATION_TABLE_NAME% ORDER BY version ASC;";

pub(crate) const GET_LAST_APPLIED_MIGRATION_QUERY: &str =
    "SELECT version, name, applied_on, checksum
    FROM %MIGRATION_TABLE_NAME% WHERE version=(SELECT MAX(version) from %MIGRATION_TABLE_NAME%)";

pub(crate) const DEFAULT_MIGRATION_TABLE_NAME: &str = "mortise_schema_history";
