use siphasher::sip::SipHasher13;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hasher;
use time::OffsetDateTime;

use crate::schema::Schema;
use crate::util::{format_identity, parse_identity};
use crate::Error;

/// A named, reversible schema change.
///
/// `up` describes the forward change and `down` its exact inverse, both by appending table
/// changes to the [`Schema`] they are handed. Nothing touches the database until a
/// [`Runner`](crate::Runner) plans and applies the collected changes.
///
/// ```
/// use mortise_core::schema::{types, Schema};
/// use mortise_core::MigrationUnit;
///
/// struct AddBrandToCars;
///
/// impl MigrationUnit for AddBrandToCars {
///     fn identity(&self) -> &str {
///         "2025_05_03_000000_add_brand_to_cars"
///     }
///
///     fn up(&self, schema: &mut Schema) {
///         schema.change_table("cars", |t| {
///             t.add_column("brand", types::varchar(255).nullable(true));
///         });
///     }
///
///     fn down(&self, schema: &mut Schema) {
///         schema.change_table("cars", |t| {
///             t.drop_column("brand");
///         });
///     }
/// }
/// ```
pub trait MigrationUnit {
    /// Timestamp-derived ordering key, `YYYY_MM_DD_NNNNNN_{name}`
    fn identity(&self) -> &str;

    fn up(&self, schema: &mut Schema);

    fn down(&self, schema: &mut Schema);
}

// an Enum set that represents the state of the migration: Applied on the database,
// or Unapplied yet to be applied on the database
#[derive(Clone, Debug)]
enum State {
    Applied,
    Unapplied,
}

/// The two directions of a migration
#[derive(Clone, Debug)]
pub struct MigrationContent {
    up: Schema,
    down: Schema,
}

impl MigrationContent {
    pub fn up(&self) -> &Schema {
        &self.up
    }

    pub fn down(&self) -> &Schema {
        &self.down
    }
}

/// Represents a migration that is either waiting to be
/// applied or already has been.
/// Unapplied migrations carry their schema changes, applied ones
/// read back from the schema history table only carry their identity and checksum.
#[derive(Clone, Debug)]
pub struct Migration {
    state: State,
    name: String,
    checksum: u64,
    version: i64,
    content: Option<MigrationContent>,
    applied_on: Option<OffsetDateTime>,
}

impl Migration {
    /// Create an unapplied migration, version and name are parsed from the identity,
    /// which must be in the format `YYYY_MM_DD_NNNNNN_{name}`.
    pub fn unapplied(identity: &str, up: Schema, down: Schema) -> Result<Migration, Error> {
        let (version, name) = parse_identity(identity)?;

        // only bytes of the canonical text are hashed, the checksum must not depend on the host
        let canonical = format!(
            "{}\n{}\nup\n{}down\n{}",
            name,
            version,
            up.canonical(),
            down.canonical()
        );
        let mut hasher = SipHasher13::new();
        hasher.write(canonical.as_bytes());
        let checksum = hasher.finish();

        Ok(Migration {
            state: State::Unapplied,
            name,
            version,
            content: Some(MigrationContent { up, down }),
            applied_on: None,
            checksum,
        })
    }

    /// Create an unapplied migration from a [`MigrationUnit`], collecting both of its directions.
    pub fn from_unit<U: MigrationUnit + ?Sized>(unit: &U) -> Result<Migration, Error> {
        let mut up = Schema::new();
        unit.up(&mut up);
        let mut down = Schema::new();
        unit.down(&mut down);

        Self::unapplied(unit.identity(), up, down)
    }

    // Create a migration from an applied migration on the database
    pub fn applied(
        version: i64,
        name: String,
        applied_on: OffsetDateTime,
        checksum: u64,
    ) -> Migration {
        Migration {
            state: State::Applied,
            name,
            checksum,
            version,
            content: None,
            applied_on: Some(applied_on),
        }
    }

    // convert the Unapplied into an Applied Migration
    pub fn set_applied(&mut self) {
        self.applied_on = Some(OffsetDateTime::now_utc());
        self.state = State::Applied;
    }

    // convert an Applied Migration back into an Unapplied one after its rollback
    pub fn set_unapplied(&mut self) {
        self.applied_on = None;
        self.state = State::Unapplied;
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.state, State::Applied)
    }

    /// Get the schema changes of the migration, `None` for migrations read from the database
    pub fn content(&self) -> Option<&MigrationContent> {
        self.content.as_ref()
    }

    /// Get the Migration version
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Get the Migration name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the Migration identity, `YYYY_MM_DD_NNNNNN_{name}`
    pub fn identity(&self) -> String {
        format_identity(self.version, &self.name)
    }

    /// Get the timestamp from when the Migration was applied. `None` when unapplied.
    pub fn applied_on(&self) -> Option<&OffsetDateTime> {
        self.applied_on.as_ref()
    }

    /// Get the Migration checksum. Checksum is formed from the name, version and schema changes of the Migration
    pub fn checksum(&self) -> u64 {
        self.checksum
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.identity())
    }
}

impl Eq for Migration {}

impl PartialEq for Migration {
    fn eq(&self, other: &Migration) -> bool {
        self.version == other.version
            && self.name == other.name
            && self.checksum() == other.checksum()
    }
}

impl Ord for Migration {
    fn cmp(&self, other: &Migration) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl PartialOrd for Migration {
    fn partial_cmp(&self, other: &Migration) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
