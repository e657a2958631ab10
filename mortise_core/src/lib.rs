#[cfg(feature = "config")]
pub mod config;
mod drivers;
pub mod error;
mod migration;
mod runner;
pub mod schema;
pub mod traits;
mod util;

pub use crate::error::Error;
pub use crate::migration::{Migration, MigrationContent, MigrationUnit};
pub use crate::runner::{ColumnPolicy, Report, RollbackTarget, Runner, Target};
pub use crate::traits::sync::{Inspect, Migrate, Query, Transaction};
pub use crate::util::{format_identity, parse_identity};

#[cfg(feature = "rusqlite")]
pub use rusqlite;

#[cfg(feature = "postgres")]
pub use postgres;

#[cfg(feature = "mysql")]
pub use mysql;
