use super::types::{BaseType, Type};

/// The SQL dialect a schema change is rendered in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlVariant {
    Sqlite,
    Postgres,
    Mysql,
}

impl SqlVariant {
    pub fn quote(&self, ident: &str) -> String {
        match self {
            SqlVariant::Mysql => format!("`{}`", ident.replace('`', "``")),
            SqlVariant::Sqlite | SqlVariant::Postgres => {
                format!("\"{}\"", ident.replace('"', "\"\""))
            }
        }
    }

    /// Whether two column names refer to the same column on this engine.
    /// Postgres keeps the case of quoted identifiers, the others compare case-insensitively.
    pub fn same_identifier(&self, a: &str, b: &str) -> bool {
        match self {
            SqlVariant::Postgres => a == b,
            SqlVariant::Sqlite | SqlVariant::Mysql => a.eq_ignore_ascii_case(b),
        }
    }

    /// Whether `ALTER TABLE .. ADD COLUMN` can place the column after another one
    pub fn supports_column_position(&self) -> bool {
        matches!(self, SqlVariant::Mysql)
    }

    pub fn column_type(&self, base: BaseType) -> String {
        match (self, base) {
            (_, BaseType::Varchar(len)) => format!("VARCHAR({})", len),
            (_, BaseType::Text) => "TEXT".into(),
            (SqlVariant::Mysql, BaseType::Integer) => "INT".into(),
            (_, BaseType::Integer) => "INTEGER".into(),
            (_, BaseType::BigInteger) => "BIGINT".into(),
            (SqlVariant::Mysql, BaseType::Boolean) => "TINYINT(1)".into(),
            (_, BaseType::Boolean) => "BOOLEAN".into(),
            (_, BaseType::Timestamp) => "TIMESTAMP".into(),
        }
    }

    pub fn add_column(&self, table: &str, column: &str, ty: &Type) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.quote(table),
            self.quote(column),
            self.column_type(ty.base())
        );

        if !ty.is_nullable() {
            sql.push_str(" NOT NULL");
        } else if *self == SqlVariant::Mysql {
            sql.push_str(" NULL");
        }

        if let Some(after) = ty.position() {
            if self.supports_column_position() {
                sql.push_str(" AFTER ");
                sql.push_str(&self.quote(after));
            }
        }
        sql
    }

    pub fn drop_column(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote(table),
            self.quote(column)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SqlVariant;
    use crate::schema::types;

    #[test]
    fn renders_add_column_for_sqlite() {
        let ty = types::string().nullable(true).after("type");
        assert_eq!(
            r#"ALTER TABLE "claims" ADD COLUMN "vehicle_type" VARCHAR(255)"#,
            SqlVariant::Sqlite.add_column("claims", "vehicle_type", &ty)
        );
    }

    #[test]
    fn renders_add_column_for_postgres() {
        let ty = types::string().nullable(true).after("type");
        assert_eq!(
            r#"ALTER TABLE "claims" ADD COLUMN "vehicle_type" VARCHAR(255)"#,
            SqlVariant::Postgres.add_column("claims", "vehicle_type", &ty)
        );
    }

    #[test]
    fn renders_add_column_after_for_mysql() {
        let ty = types::string().nullable(true).after("type");
        assert_eq!(
            "ALTER TABLE `claims` ADD COLUMN `vehicle_type` VARCHAR(255) NULL AFTER `type`",
            SqlVariant::Mysql.add_column("claims", "vehicle_type", &ty)
        );
    }

    #[test]
    fn renders_not_null_columns() {
        let ty = types::boolean();
        assert_eq!(
            "ALTER TABLE `claims` ADD COLUMN `settled` TINYINT(1) NOT NULL",
            SqlVariant::Mysql.add_column("claims", "settled", &ty)
        );
        assert_eq!(
            r#"ALTER TABLE "claims" ADD COLUMN "settled" BOOLEAN NOT NULL"#,
            SqlVariant::Sqlite.add_column("claims", "settled", &ty)
        );
    }

    #[test]
    fn renders_drop_column() {
        assert_eq!(
            r#"ALTER TABLE "claims" DROP COLUMN "vehicle_type""#,
            SqlVariant::Postgres.drop_column("claims", "vehicle_type")
        );
        assert_eq!(
            "ALTER TABLE `claims` DROP COLUMN `vehicle_type`",
            SqlVariant::Mysql.drop_column("claims", "vehicle_type")
        );
    }

    #[test]
    fn escapes_quotes_in_identifiers() {
        assert_eq!(r#""odd""name""#, SqlVariant::Sqlite.quote(r#"odd"name"#));
        assert_eq!("`odd``name`", SqlVariant::Mysql.quote("odd`name"));
    }

    #[test]
    fn compares_identifiers_per_engine() {
        assert!(SqlVariant::Sqlite.same_identifier("Type", "type"));
        assert!(SqlVariant::Mysql.same_identifier("Type", "type"));
        assert!(!SqlVariant::Postgres.same_identifier("Type", "type"));
    }
}
