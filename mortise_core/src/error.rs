use crate::{Migration, Report};
use std::fmt;
use thiserror::Error as TError;

/// An Error occurred during a migration cycle
#[derive(Debug)]
pub struct Error {
    kind: Box<Kind>,
    report: Option<Report>,
}

impl Error {
    /// Instantiate a new Error
    pub(crate) fn new(kind: Kind, report: Option<Report>) -> Error {
        Error {
            kind: Box::new(kind),
            report,
        }
    }

    /// Attach the report of the migration cycle to an Error that was raised without one
    pub(crate) fn with_report(self, report: Report) -> Error {
        Error {
            report: self.report.or(Some(report)),
            ..self
        }
    }

    /// Return the Report of the migration cycle if any
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Return the kind of error occurred
    pub fn kind(&self) -> &Kind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

/// Enum listing possible errors from Mortise.
#[derive(Debug, TError)]
pub enum Kind {
    /// An Error from an invalid migration identity
    #[error("migration identity must be in the format YYYY_MM_DD_NNNNNN_{{name}}, got {0}")]
    InvalidName(String),
    /// An Error from an identity whose timestamp is not a valid version
    #[error("migration version must be a valid timestamp, got {0}")]
    InvalidVersion(String),
    /// An Error from a repeated version, migration versions must be unique
    #[error("migration {0} is repeated, migration versions must be unique")]
    RepeatedVersion(Migration),
    /// An Error from a divergent version, the applied version is different to the known one
    #[error("applied migration {0} is different than the known one {1}")]
    DivergentVersion(Migration, Migration),
    /// An Error from a missing version, the applied version is not known to the runner
    #[error("migration {0} is missing from the known migrations")]
    MissingVersion(Migration),
    /// The table a migration changes does not exist
    #[error("table {0} does not exist")]
    TableNotFound(String),
    /// A column a migration adds is already present on the table
    #[error("column {1} already exists on table {0}")]
    ColumnAlreadyExists(String, String),
    /// A column a migration drops is not present on the table
    #[error("column {1} does not exist on table {0}")]
    ColumnNotFound(String, String),
    /// An Error parsing mortise Config
    #[error("Error parsing config: {0}")]
    ConfigError(String),
    /// An Error from an underlying database connection Error
    #[error("`{0}`, `{1}`")]
    Connection(String, #[source] Box<dyn std::error::Error + Sync + Send>),
}

// Helper trait for adding custom messages and applied migrations to Connection error's.
pub trait WrapMigrationError<T, E> {
    fn migration_err(self, msg: &str, report: Option<&[Migration]>) -> Result<T, Error>;
}

impl<T, E> WrapMigrationError<T, E> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn migration_err(
        self,
        msg: &str,
        applied_migrations: Option<&[Migration]>,
    ) -> Result<T, Error> {
        match self {
            Ok(report) => Ok(report),
            Err(err) => Err(Error {
                kind: Box::new(Kind::Connection(msg.into(), Box::new(err))),
                report: applied_migrations.map(|am| Report::new(am.to_vec(), Vec::new())),
            }),
        }
    }
}
