use crate::schema::SqlVariant;
use crate::traits::sync::{Inspect, Migrate, Query, Transaction};
use crate::Migration;

use rusqlite::{Connection as RqlConnection, Error as RqlError};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const TABLE_COLUMNS_QUERY: &str =
    "SELECT name FROM pragma_table_info(?1) ORDER BY cid";

fn query_applied_migrations(
    transaction: &RqlConnection,
    query: &str,
) -> Result<Vec<Migration>, RqlError> {
    let mut stmt = transaction.prepare(query)?;
    let mut rows = stmt.query([])?;
    let mut applied = Vec::new();
    while let Some(row) = rows.next()? {
        let version = row.get(0)?;
        let applied_on: String = row.get(2)?;
        // Safe to call unwrap, as we stored it in RFC3339 format on the database
        let applied_on = OffsetDateTime::parse(&applied_on, &Rfc3339).unwrap();

        let checksum: String = row.get(3)?;
        applied.push(Migration::applied(
            version,
            row.get(1)?,
            applied_on,
            checksum
                .parse::<u64>()
                .expect("checksum must be a valid u64"),
        ));
    }
    Ok(applied)
}

impl Transaction for RqlConnection {
    type Error = RqlError;
    fn execute(&mut self, queries: &[&str]) -> Result<usize, Self::Error> {
        let transaction = self.transaction()?;
        let mut count = 0;
        for query in queries.iter() {
            transaction.execute_batch(query)?;
            count += 1;
        }
        transaction.commit()?;
        Ok(count)
    }
}

impl Query<Vec<Migration>> for RqlConnection {
    fn query(&mut self, query: &str) -> Result<Vec<Migration>, Self::Error> {
        let transaction = self.transaction()?;
        let applied = query_applied_migrations(&transaction, query)?;
        transaction.commit()?;
        Ok(applied)
    }
}

impl Inspect for RqlConnection {
    fn sql_variant(&self) -> SqlVariant {
        SqlVariant::Sqlite
    }

    fn table_columns(&mut self, table: &str) -> Result<Option<Vec<String>>, Self::Error> {
        let mut stmt = self.prepare(TABLE_COLUMNS_QUERY)?;
        let columns = stmt
            .query_map([table], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        // a table always has at least one column
        Ok(Some(columns).filter(|columns| !columns.is_empty()))
    }
}

impl Migrate for RqlConnection {}
