//! Column types a migration can add, modeled after the `barrel` type builders.
//!
//! ```
//! use mortise_core::schema::types;
//!
//! let ty = types::string().nullable(true).after("type");
//! assert!(ty.is_nullable());
//! assert_eq!(Some("type"), ty.position());
//! ```

use std::fmt;

/// The storage type of a column, independent of the SQL dialect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    Varchar(u32),
    Text,
    Integer,
    BigInteger,
    Boolean,
    Timestamp,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Varchar(len) => write!(f, "varchar({})", len),
            BaseType::Text => f.write_str("text"),
            BaseType::Integer => f.write_str("integer"),
            BaseType::BigInteger => f.write_str("big_integer"),
            BaseType::Boolean => f.write_str("boolean"),
            BaseType::Timestamp => f.write_str("timestamp"),
        }
    }
}

/// A column type together with its modifiers
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    base: BaseType,
    nullable: bool,
    after: Option<String>,
}

impl Type {
    fn new(base: BaseType) -> Type {
        Type {
            base,
            nullable: false,
            after: None,
        }
    }

    /// Set whether the column accepts `NULL`. Columns are `NOT NULL` unless told otherwise.
    pub fn nullable(self, nullable: bool) -> Type {
        Type { nullable, ..self }
    }

    /// Place the column right after `column`.
    ///
    /// The hint is advisory, engines without ordered-column support append the column instead.
    pub fn after(self, column: &str) -> Type {
        Type {
            after: Some(column.into()),
            ..self
        }
    }

    pub fn base(&self) -> BaseType {
        self.base
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The column this one should follow, if any
    pub fn position(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub(crate) fn without_position(self) -> Type {
        Type { after: None, ..self }
    }
}

/// A variable length string of at most `len` characters
pub fn varchar(len: u32) -> Type {
    Type::new(BaseType::Varchar(len))
}

/// A `varchar(255)`, the common default for short strings
pub fn string() -> Type {
    varchar(255)
}

pub fn text() -> Type {
    Type::new(BaseType::Text)
}

pub fn integer() -> Type {
    Type::new(BaseType::Integer)
}

pub fn big_integer() -> Type {
    Type::new(BaseType::BigInteger)
}

pub fn boolean() -> Type {
    Type::new(BaseType::Boolean)
}

pub fn timestamp() -> Type {
    Type::new(BaseType::Timestamp)
}

#[cfg(test)]
mod tests {
    use super::{string, text, BaseType};

    #[test]
    fn columns_are_not_null_by_default() {
        assert!(!text().is_nullable());
        assert_eq!(None, text().position());
    }

    #[test]
    fn string_is_a_varchar_255() {
        assert_eq!(BaseType::Varchar(255), string().base());
    }

    #[test]
    fn without_position_keeps_other_modifiers() {
        let ty = string().nullable(true).after("type").without_position();
        assert!(ty.is_nullable());
        assert_eq!(None, ty.position());
    }
}
