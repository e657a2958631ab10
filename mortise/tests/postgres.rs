use barrel::backend::Pg as Sql;

#[cfg(feature = "postgres")]
mod postgres {
    use super::Sql;
    use barrel::types as barrel_types;
    use mortise::migrations;
    use mortise::{Kind, Target};
    use mortise_core::postgres::{Client, NoTls};

    const DATABASE_URL: &str = "postgres://postgres@localhost:5432/postgres";

    fn connect() -> Client {
        Client::connect(DATABASE_URL, NoTls).unwrap()
    }

    fn create_claims_table(client: &mut Client) {
        let mut m = barrel::Migration::new();

        m.create_table("claims", |t| {
            t.add_column("id", barrel_types::primary());
            t.add_column("type", barrel_types::varchar(255));
        });

        client.batch_execute(&m.make::<Sql>()).unwrap();
    }

    fn claims_columns(client: &mut Client) -> Vec<(String, String)> {
        client
            .query(
                "SELECT column_name::text, is_nullable::text FROM information_schema.columns \
                 WHERE table_schema = current_schema() AND table_name = 'claims' \
                 ORDER BY ordinal_position",
                &[],
            )
            .unwrap()
            .into_iter()
            .map(|row| (row.get(0), row.get(1)))
            .collect()
    }

    fn clean_database() {
        let mut client = connect();

        client
            .batch_execute(
                "DROP TABLE IF EXISTS claims; DROP TABLE IF EXISTS mortise_schema_history;",
            )
            .unwrap();
    }

    fn run_test<T>(test: T)
    where
        T: FnOnce() + std::panic::UnwindSafe,
    {
        let result = std::panic::catch_unwind(|| test());

        clean_database();

        assert!(result.is_ok())
    }

    #[test]
    fn adds_nullable_vehicle_type() {
        run_test(|| {
            let mut client = connect();
            create_claims_table(&mut client);

            let report = migrations::runner().unwrap().run(&mut client).unwrap();

            assert_eq!(1, report.applied_migrations().len());
            assert_eq!(
                vec![
                    ("id".to_string(), "NO".to_string()),
                    ("type".to_string(), "NO".to_string()),
                    ("vehicle_type".to_string(), "YES".to_string()),
                ],
                claims_columns(&mut client)
            );
        });
    }

    #[test]
    fn existing_claims_read_null_vehicle_type() {
        run_test(|| {
            let mut client = connect();
            create_claims_table(&mut client);
            client
                .batch_execute("INSERT INTO claims (type) VALUES ('collision'), ('theft')")
                .unwrap();

            migrations::runner().unwrap().run(&mut client).unwrap();

            let row = client
                .query_one(
                    "SELECT COUNT(*) FROM claims WHERE vehicle_type IS NULL",
                    &[],
                )
                .unwrap();
            let nulls: i64 = row.get(0);
            assert_eq!(2, nulls);
        });
    }

    #[test]
    fn up_then_down_restores_claims_table() {
        run_test(|| {
            let mut client = connect();
            create_claims_table(&mut client);
            let before = claims_columns(&mut client);

            migrations::runner().unwrap().run(&mut client).unwrap();
            let report = migrations::runner().unwrap().rollback(&mut client).unwrap();

            assert_eq!(1, report.reverted_migrations().len());
            assert_eq!(before, claims_columns(&mut client));
            let row = client
                .query_one("SELECT COUNT(*) FROM mortise_schema_history", &[])
                .unwrap();
            let applied: i64 = row.get(0);
            assert_eq!(0, applied);
        });
    }

    #[test]
    fn strict_down_fails_when_vehicle_type_never_existed() {
        run_test(|| {
            let mut client = connect();
            create_claims_table(&mut client);
            migrations::runner()
                .unwrap()
                .set_target(Target::Fake)
                .run(&mut client)
                .unwrap();

            let err = migrations::runner()
                .unwrap()
                .rollback(&mut client)
                .unwrap_err();

            match err.kind() {
                Kind::ColumnNotFound(table, column) => {
                    assert_eq!("claims", table);
                    assert_eq!("vehicle_type", column);
                }
                _ => panic!("failed test"),
            }
        });
    }

    #[test]
    fn fails_when_claims_table_is_missing() {
        run_test(|| {
            let mut client = connect();

            let err = migrations::runner().unwrap().run(&mut client).unwrap_err();

            match err.kind() {
                Kind::TableNotFound(table) => assert_eq!("claims", table),
                _ => panic!("failed test"),
            }
        });
    }
}
