/*!
Reversible schema migrations for the claims database.

`mortise` describes each schema change as a [`MigrationUnit`]: an identity derived from its
creation timestamp, an `up` direction and the `down` direction that undoes it. Both directions
are declared through a [`Schema`](schema::Schema) builder, and are only checked against the
live tables and rendered to SQL when a [`Runner`] applies them on a connection.\
currently [`Rusqlite`](https://crates.io/crates/rusqlite), [`Postgres`](https://crates.io/crates/postgres)
and [`Mysql`](https://crates.io/crates/mysql) connections are supported, each behind its cargo feature.

## Usage

- Migration identities must be in the format `YYYY_MM_DD_NNNNNN_{name}`, the timestamp orders them.
- Applied migrations are recorded in the `mortise_schema_history` table.
- Adding a column that already exists or dropping one that doesn't fails unless the runner is set to
  [`ColumnPolicy::Lenient`].

### Example
```rust,no_run
use rusqlite::Connection;

let mut conn = Connection::open_in_memory().unwrap();
mortise::migrations::runner().unwrap().run(&mut conn).unwrap();
```
*/

pub mod migrations;

#[cfg(feature = "config")]
pub use mortise_core::config;
pub use mortise_core::error::Kind;
pub use mortise_core::schema;
pub use mortise_core::{
    ColumnPolicy, Error, Inspect, Migrate, Migration, MigrationUnit, Report, RollbackTarget,
    Runner, Target,
};
