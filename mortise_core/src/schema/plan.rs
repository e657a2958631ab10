use super::{ColumnChange, Schema};
use crate::error::{Kind, WrapMigrationError};
use crate::runner::ColumnPolicy;
use crate::traits::sync::Inspect;
use crate::Error;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

fn probe_columns<C: Inspect>(conn: &mut C, table: &str) -> Result<Vec<String>, Error> {
    conn.table_columns(table)
        .migration_err(&format!("error reading the columns of table {table}"), None)?
        .ok_or_else(|| Error::new(Kind::TableNotFound(table.into()), None))
}

// Resolves a schema against the live tables behind `conn` and renders the statements to run.
// Changes on a table see the effect of the changes before them on the same table.
pub(crate) fn plan_schema<C: Inspect>(
    conn: &mut C,
    schema: &Schema,
    policy: ColumnPolicy,
) -> Result<Vec<String>, Error> {
    let variant = conn.sql_variant();
    let mut statements = Vec::new();
    let mut known: HashMap<String, Vec<String>> = HashMap::new();

    for table in schema.tables() {
        let columns = match known.entry(table.name().to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(probe_columns(conn, table.name())?),
        };

        for change in table.changes() {
            let present = columns
                .iter()
                .position(|c| variant.same_identifier(c, change.column()));

            match (change, present) {
                (ColumnChange::Add { name, .. }, Some(_)) => {
                    policy.check(Kind::ColumnAlreadyExists(table.name().into(), name.clone()))?;
                }
                (ColumnChange::Add { name, ty }, None) => {
                    let mut ty = ty.clone();
                    if let Some(after) = ty.position() {
                        if !columns.iter().any(|c| variant.same_identifier(c, after)) {
                            log::warn!(
                                "column {} is not on table {}, adding {} without a position",
                                after,
                                table.name(),
                                name
                            );
                            ty = ty.without_position();
                        }
                    }
                    statements.push(variant.add_column(table.name(), name, &ty));
                    columns.push(name.clone());
                }
                (ColumnChange::Drop { name }, None) => {
                    policy.check(Kind::ColumnNotFound(table.name().into(), name.clone()))?;
                }
                (ColumnChange::Drop { name }, Some(index)) => {
                    statements.push(variant.drop_column(table.name(), name));
                    columns.remove(index);
                }
            }
        }
    }

    Ok(statements)
}
