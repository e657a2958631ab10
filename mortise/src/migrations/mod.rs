//! The migrations of the claims database, in the order they were written.

mod m2025_11_14_000001_add_vehicle_type_to_claims;

pub use m2025_11_14_000001_add_vehicle_type_to_claims::AddVehicleTypeToClaims;

use mortise_core::{Error, Migration, MigrationUnit, Runner};

/// Every known migration unit
pub fn units() -> Vec<Box<dyn MigrationUnit>> {
    vec![Box::new(AddVehicleTypeToClaims)]
}

/// Every known migration, ready to be handed to a [`Runner`]
pub fn all() -> Result<Vec<Migration>, Error> {
    units()
        .iter()
        .map(|unit| Migration::from_unit(unit.as_ref()))
        .collect()
}

/// A [`Runner`] over every known migration with the default settings
pub fn runner() -> Result<Runner, Error> {
    Ok(Runner::new(&all()?))
}

#[cfg(test)]
mod tests {
    use super::{all, runner};

    #[test]
    fn identities_are_unique_and_ordered() {
        let migrations = all().unwrap();
        let mut sorted = migrations.clone();
        sorted.sort();
        sorted.dedup_by_key(|m| m.version());
        assert_eq!(migrations, sorted);
    }

    #[test]
    fn runner_gathers_all_migrations() {
        assert_eq!(all().unwrap(), *runner().unwrap().get_migrations());
    }
}
