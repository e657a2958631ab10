//! Declarative schema changes.
//!
//! A [`Schema`] collects the table changes of one direction of a migration. Changes to a
//! table are described inside a callback that receives a fresh [`Table`], the table is
//! only added to the schema once the callback returns.
//!
//! ```
//! use mortise_core::schema::{types, Schema};
//!
//! let mut schema = Schema::new();
//! schema.change_table("claims", |t| {
//!     t.add_column("vehicle_type", types::string().nullable(true).after("type"));
//! });
//! assert_eq!(1, schema.tables().len());
//! ```

mod backend;
pub(crate) mod plan;
pub mod types;

pub use backend::SqlVariant;
pub use types::Type;

/// A single column change on a table
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnChange {
    Add { name: String, ty: Type },
    Drop { name: String },
}

impl ColumnChange {
    /// Name of the column the change is about
    pub fn column(&self) -> &str {
        match self {
            ColumnChange::Add { name, .. } | ColumnChange::Drop { name } => name,
        }
    }
}

/// The ordered column changes to apply on one existing table
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Table {
    name: String,
    changes: Vec<ColumnChange>,
}

impl Table {
    fn new(name: &str) -> Table {
        Table {
            name: name.into(),
            changes: Vec::new(),
        }
    }

    pub fn add_column(&mut self, name: &str, ty: Type) -> &mut Table {
        self.changes.push(ColumnChange::Add {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn drop_column(&mut self, name: &str) -> &mut Table {
        self.changes.push(ColumnChange::Drop { name: name.into() });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn changes(&self) -> &[ColumnChange] {
        &self.changes
    }
}

/// Collects the table changes of one migration direction
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    /// Describe changes to the existing table `name`.
    pub fn change_table<F>(&mut self, name: &str, callback: F)
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::new(name);
        callback(&mut table);
        self.tables.push(table);
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|t| t.changes.is_empty())
    }

    /// One line per change, independent of the host and of the SQL dialect.
    /// Migration checksums are computed over this text.
    pub(crate) fn canonical(&self) -> String {
        let mut out = String::new();
        for table in self.tables.iter() {
            for change in table.changes.iter() {
                match change {
                    ColumnChange::Add { name, ty } => {
                        out.push_str(&format!("{} add {} {}", table.name, name, ty.base()));
                        out.push_str(if ty.is_nullable() { " null" } else { " not null" });
                        if let Some(after) = ty.position() {
                            out.push_str(" after ");
                            out.push_str(after);
                        }
                    }
                    ColumnChange::Drop { name } => {
                        out.push_str(&format!("{} drop {}", table.name, name));
                    }
                }
                out.push('\n');
            }
        }
        out
    }

    /// Build the schema that undoes this one.
    ///
    /// Only column additions can be inverted without knowing the dropped column's type,
    /// returns `None` as soon as a drop is found.
    pub fn inverse(&self) -> Option<Schema> {
        let mut tables = Vec::with_capacity(self.tables.len());
        for table in self.tables.iter().rev() {
            let mut inverse = Table::new(&table.name);
            for change in table.changes.iter().rev() {
                match change {
                    ColumnChange::Add { name, .. } => {
                        inverse.drop_column(name);
                    }
                    ColumnChange::Drop { .. } => return None,
                }
            }
            tables.push(inverse);
        }
        Some(Schema { tables })
    }
}

#[cfg(test)]
mod tests {
    use super::{types, ColumnChange, Schema};

    #[test]
    fn change_table_keeps_changes_in_order() {
        let mut schema = Schema::new();
        schema.change_table("claims", |t| {
            t.add_column("vehicle_type", types::string().nullable(true))
                .drop_column("legacy");
        });

        let table = &schema.tables()[0];
        assert_eq!("claims", table.name());
        assert_eq!("vehicle_type", table.changes()[0].column());
        assert_eq!(
            ColumnChange::Drop {
                name: "legacy".into()
            },
            table.changes()[1]
        );
    }

    #[test]
    fn empty_callback_makes_an_empty_schema() {
        let mut schema = Schema::new();
        schema.change_table("claims", |_| {});
        assert!(schema.is_empty());
    }

    #[test]
    fn inverse_drops_added_columns_in_reverse_order() {
        let mut schema = Schema::new();
        schema.change_table("claims", |t| {
            t.add_column("vehicle_type", types::string().nullable(true));
            t.add_column("vehicle_year", types::integer().nullable(true));
        });

        let mut expected = Schema::new();
        expected.change_table("claims", |t| {
            t.drop_column("vehicle_year");
            t.drop_column("vehicle_type");
        });
        assert_eq!(Some(expected), schema.inverse());
    }

    #[test]
    fn canonical_lists_one_change_per_line() {
        let mut schema = Schema::new();
        schema.change_table("claims", |t| {
            t.add_column("vehicle_type", types::string().nullable(true).after("type"))
                .add_column("reported_on", types::timestamp());
        });
        schema.change_table("cars", |t| {
            t.drop_column("brand");
        });
        assert_eq!(
            "claims add vehicle_type varchar(255) null after type\n\
             claims add reported_on timestamp not null\n\
             cars drop brand\n",
            schema.canonical()
        );
    }

    #[test]
    fn inverse_of_a_drop_is_unknown() {
        let mut schema = Schema::new();
        schema.change_table("claims", |t| {
            t.drop_column("vehicle_type");
        });
        assert!(schema.inverse().is_none());
    }
}
