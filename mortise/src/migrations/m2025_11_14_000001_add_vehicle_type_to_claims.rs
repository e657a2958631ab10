use mortise_core::schema::{types, Schema};
use mortise_core::MigrationUnit;

/// Records which kind of vehicle a claim is about, `NULL` for claims filed before it existed.
pub struct AddVehicleTypeToClaims;

impl MigrationUnit for AddVehicleTypeToClaims {
    fn identity(&self) -> &str {
        "2025_11_14_000001_add_vehicle_type_to_claims"
    }

    fn up(&self, schema: &mut Schema) {
        schema.change_table("claims", |t| {
            t.add_column("vehicle_type", types::string().nullable(true).after("type"));
        });
    }

    fn down(&self, schema: &mut Schema) {
        schema.change_table("claims", |t| {
            t.drop_column("vehicle_type");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::AddVehicleTypeToClaims;
    use mortise_core::schema::{types, ColumnChange, Schema};
    use mortise_core::{Migration, MigrationUnit};

    #[test]
    fn up_adds_nullable_vehicle_type_after_type() {
        let mut schema = Schema::new();
        AddVehicleTypeToClaims.up(&mut schema);

        let table = &schema.tables()[0];
        assert_eq!("claims", table.name());
        assert_eq!(
            &[ColumnChange::Add {
                name: "vehicle_type".into(),
                ty: types::varchar(255).nullable(true).after("type"),
            }],
            table.changes()
        );
    }

    #[test]
    fn down_is_the_inverse_of_up() {
        let migration = Migration::from_unit(&AddVehicleTypeToClaims).unwrap();
        let content = migration.content().unwrap();
        assert_eq!(Some(content.down().clone()), content.up().inverse());
    }

    #[test]
    fn identity_orders_by_timestamp() {
        let migration = Migration::from_unit(&AddVehicleTypeToClaims).unwrap();
        assert_eq!(20251114000001, migration.version());
        assert_eq!("add_vehicle_type_to_claims", migration.name());
    }

    #[test]
    fn checksum_is_stable() {
        // recorded in every schema history table this migration was applied to
        let migration = Migration::from_unit(&AddVehicleTypeToClaims).unwrap();
        assert_eq!(7167968797715655727, migration.checksum());
    }
}
