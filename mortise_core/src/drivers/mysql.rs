use crate::schema::SqlVariant;
use crate::traits::sync::{Inspect, Migrate, Query, Transaction};
use crate::Migration;
use mysql::{
    error::Error as MError, prelude::Queryable, Conn, IsolationLevel, PooledConn,
    Transaction as MTransaction, TxOpts,
};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const TABLE_COLUMNS_QUERY: &str = "SELECT COLUMN_NAME \
    FROM information_schema.COLUMNS \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
    ORDER BY ORDINAL_POSITION";

fn get_tx_opts() -> TxOpts {
    TxOpts::default()
        .set_with_consistent_snapshot(true)
        .set_access_mode(None)
        .set_isolation_level(Some(IsolationLevel::RepeatableRead))
}

fn query_applied_migrations(
    transaction: &mut MTransaction,
    query: &str,
) -> Result<Vec<Migration>, MError> {
    let rows: Vec<(i64, String, String, String)> = transaction.query(query)?;
    let mut applied = Vec::new();
    for (version, name, applied_on, checksum) in rows {
        // Safe to call unwrap, as we stored it in RFC3339 format on the database
        let applied_on = OffsetDateTime::parse(&applied_on, &Rfc3339).unwrap();

        applied.push(Migration::applied(
            version,
            name,
            applied_on,
            checksum
                .parse::<u64>()
                .expect("checksum must be a valid u64"),
        ))
    }
    Ok(applied)
}

fn query_table_columns<Q: Queryable>(
    conn: &mut Q,
    table: &str,
) -> Result<Option<Vec<String>>, MError> {
    let columns = conn.exec_map(TABLE_COLUMNS_QUERY, (table,), |(name,): (String,)| name)?;

    // a table always has at least one column
    Ok(Some(columns).filter(|columns| !columns.is_empty()))
}

// MySQL commits DDL statements implicitly, the transaction only covers the schema history update
fn execute_in_transaction(
    transaction: &mut MTransaction,
    queries: &[&str],
) -> Result<usize, MError> {
    let mut count = 0;
    for query in queries.iter() {
        transaction.query_drop(query)?;
        count += 1;
    }
    Ok(count)
}

impl Transaction for Conn {
    type Error = MError;

    fn execute(&mut self, queries: &[&str]) -> Result<usize, Self::Error> {
        let mut transaction = self.start_transaction(get_tx_opts())?;
        let count = execute_in_transaction(&mut transaction, queries)?;
        transaction.commit()?;
        Ok(count)
    }
}

impl Transaction for PooledConn {
    type Error = MError;

    fn execute(&mut self, queries: &[&str]) -> Result<usize, Self::Error> {
        let mut transaction = self.start_transaction(get_tx_opts())?;
        let count = execute_in_transaction(&mut transaction, queries)?;
        transaction.commit()?;
        Ok(count)
    }
}

impl Query<Vec<Migration>> for Conn {
    fn query(&mut self, query: &str) -> Result<Vec<Migration>, Self::Error> {
        let mut transaction = self.start_transaction(get_tx_opts())?;
        let applied = query_applied_migrations(&mut transaction, query)?;
        transaction.commit()?;
        Ok(applied)
    }
}

impl Query<Vec<Migration>> for PooledConn {
    fn query(&mut self, query: &str) -> Result<Vec<Migration>, Self::Error> {
        let mut transaction = self.start_transaction(get_tx_opts())?;
        let applied = query_applied_migrations(&mut transaction, query)?;
        transaction.commit()?;
        Ok(applied)
    }
}

impl Inspect for Conn {
    fn sql_variant(&self) -> SqlVariant {
        SqlVariant::Mysql
    }

    fn table_columns(&mut self, table: &str) -> Result<Option<Vec<String>>, Self::Error> {
        query_table_columns(self, table)
    }
}

impl Inspect for PooledConn {
    fn sql_variant(&self) -> SqlVariant {
        SqlVariant::Mysql
    }

    fn table_columns(&mut self, table: &str) -> Result<Option<Vec<String>>, Self::Error> {
        query_table_columns(self, table)
    }
}

impl Migrate for Conn {}
impl Migrate for PooledConn {}
