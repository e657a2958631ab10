use crate::error::{Kind, WrapMigrationError};
use crate::schema::plan::plan_schema;
use crate::schema::SqlVariant;
use crate::traits::{
    delete_migration_query, insert_migration_query, verify_migrations,
    ASSERT_MIGRATIONS_TABLE_QUERY, GET_APPLIED_MIGRATIONS_QUERY, GET_LAST_APPLIED_MIGRATION_QUERY,
};
use crate::{ColumnPolicy, Error, Migration, Report, Target};

pub trait Transaction {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs all `queries` in one transaction, returning how many were run.
    fn execute(&mut self, queries: &[&str]) -> Result<usize, Self::Error>;
}

pub trait Query<T>: Transaction {
    fn query(&mut self, query: &str) -> Result<T, Self::Error>;
}

/// The live schema handle migrations are planned against
pub trait Inspect: Transaction {
    /// The dialect schema changes are rendered in for this connection
    fn sql_variant(&self) -> SqlVariant;

    /// The column names of `table` in declaration order, `None` if the table does not exist
    fn table_columns(&mut self, table: &str) -> Result<Option<Vec<String>>, Self::Error>;
}

pub fn migrate<T: Inspect>(
    transaction: &mut T,
    migrations: Vec<Migration>,
    target: Target,
    column_policy: ColumnPolicy,
    migration_table_name: &str,
) -> Result<Report, Error> {
    let fake = matches!(target, Target::Fake | Target::FakeVersion(_));
    if fake {
        log::info!("not going to apply any migration as fake flag is enabled.");
    }

    let mut applied_migrations = Vec::new();

    for mut migration in migrations.into_iter() {
        if let Target::Version(input_target) | Target::FakeVersion(input_target) = target {
            if input_target < migration.version() {
                log::info!(
                    "stopping at migration: {}, due to user option",
                    input_target
                );
                break;
            }
        }

        let mut statements = Vec::new();
        if !fake {
            let content = migration
                .content()
                .ok_or_else(|| missing_content(&migration))?;
            log::info!("applying migration: {migration} ...");
            statements = plan_schema(transaction, content.up(), column_policy)
                .map_err(|err| err.with_report(Report::new(applied_migrations.clone(), vec![])))?;
        }

        migration.set_applied();
        statements.push(insert_migration_query(&migration, migration_table_name)?);

        let refs: Vec<&str> = statements.iter().map(AsRef::as_ref).collect();
        transaction.execute(&refs).migration_err(
            &format!("error applying migration {migration}"),
            Some(&applied_migrations),
        )?;
        log::info!("applied migration:  {migration} writing state to db.");
        applied_migrations.push(migration);
    }

    Ok(Report::new(applied_migrations, Vec::new()))
}

pub fn rollback<T: Inspect>(
    transaction: &mut T,
    migrations: Vec<Migration>,
    column_policy: ColumnPolicy,
    migration_table_name: &str,
) -> Result<Report, Error> {
    let mut reverted_migrations = Vec::new();

    for mut migration in migrations.into_iter() {
        let content = migration
            .content()
            .ok_or_else(|| missing_content(&migration))?;

        log::info!("reverting migration: {migration} ...");
        let mut statements = plan_schema(transaction, content.down(), column_policy)
            .map_err(|err| err.with_report(Report::new(vec![], reverted_migrations.clone())))?;
        statements.push(delete_migration_query(&migration, migration_table_name));

        let refs: Vec<&str> = statements.iter().map(AsRef::as_ref).collect();
        transaction
            .execute(&refs)
            .migration_err(&format!("error reverting migration {migration}"), None)
            .map_err(|err| err.with_report(Report::new(vec![], reverted_migrations.clone())))?;

        migration.set_unapplied();
        log::info!("reverted migration: {migration}, removed from schema history.");
        reverted_migrations.push(migration);
    }

    Ok(Report::new(Vec::new(), reverted_migrations))
}

fn missing_content(migration: &Migration) -> Error {
    Error::new(Kind::MissingVersion(migration.clone()), None)
}

pub trait Migrate: Query<Vec<Migration>> + Inspect
where
    Self: Sized,
{
    fn assert_migrations_table_query(migration_table_name: &str) -> String {
        ASSERT_MIGRATIONS_TABLE_QUERY.replace("%MIGRATION_TABLE_NAME%", migration_table_name)
    }

    fn get_last_applied_migration_query(migration_table_name: &str) -> String {
        GET_LAST_APPLIED_MIGRATION_QUERY.replace("%MIGRATION_TABLE_NAME%", migration_table_name)
    }

    fn get_applied_migrations_query(migration_table_name: &str) -> String {
        GET_APPLIED_MIGRATIONS_QUERY.replace("%MIGRATION_TABLE_NAME%", migration_table_name)
    }

    fn assert_migrations_table(&mut self, migration_table_name: &str) -> Result<usize, Error> {
        self.execute(&[Self::assert_migrations_table_query(migration_table_name).as_str()])
            .migration_err("error asserting migrations table", None)
    }

    fn get_last_applied_migration(
        &mut self,
        migration_table_name: &str,
    ) -> Result<Option<Migration>, Error> {
        let mut migrations = self
            .query(Self::get_last_applied_migration_query(migration_table_name).as_str())
            .migration_err("error getting last applied migration", None)?;

        Ok(migrations.pop())
    }

    fn get_applied_migrations(
        &mut self,
        migration_table_name: &str,
    ) -> Result<Vec<Migration>, Error> {
        let migrations = self
            .query(Self::get_applied_migrations_query(migration_table_name).as_str())
            .migration_err("error getting applied migrations", None)?;

        Ok(migrations)
    }

    fn get_unapplied_migrations(
        &mut self,
        migrations: &[Migration],
        abort_divergent: bool,
        abort_missing: bool,
        migration_table_name: &str,
    ) -> Result<Vec<Migration>, Error> {
        self.assert_migrations_table(migration_table_name)?;

        let applied_migrations = self.get_applied_migrations(migration_table_name)?;

        let migrations = verify_migrations(
            applied_migrations,
            migrations.to_vec(),
            abort_divergent,
            abort_missing,
        )?;

        if migrations.is_empty() {
            log::info!("no migrations to apply");
        }

        Ok(migrations)
    }

    fn migrate(
        &mut self,
        migrations: &[Migration],
        abort_divergent: bool,
        abort_missing: bool,
        column_policy: ColumnPolicy,
        target: Target,
        migration_table_name: &str,
    ) -> Result<Report, Error> {
        let migrations = self.get_unapplied_migrations(
            migrations,
            abort_divergent,
            abort_missing,
            migration_table_name,
        )?;

        migrate(self, migrations, target, column_policy, migration_table_name)
    }

    /// Reverts the applied migrations selected by `select`, newest first.
    ///
    /// Every migration to revert must be known, as its `down` changes are needed.
    fn rollback<F>(
        &mut self,
        migrations: &[Migration],
        abort_divergent: bool,
        column_policy: ColumnPolicy,
        select: F,
        migration_table_name: &str,
    ) -> Result<Report, Error>
    where
        F: FnOnce(Vec<Migration>) -> Vec<Migration>,
    {
        self.assert_migrations_table(migration_table_name)?;
        let applied = self.get_applied_migrations(migration_table_name)?;

        // unknown applied migrations only fail the rollback when they are selected to be reverted
        verify_migrations(applied.clone(), migrations.to_vec(), abort_divergent, false)?;

        let mut to_revert = Vec::new();
        for app in select(applied).into_iter() {
            match migrations.iter().find(|m| m.version() == app.version()) {
                Some(migration) => {
                    let mut migration = migration.clone();
                    migration.set_applied();
                    to_revert.push(migration);
                }
                None => return Err(Error::new(Kind::MissingVersion(app), None)),
            }
        }

        if to_revert.is_empty() {
            log::info!("no migrations to revert");
        }

        rollback(self, to_revert, column_policy, migration_table_name)
    }
}
