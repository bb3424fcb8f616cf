use sqlx::PgPool;

/// Schema checks run against every application table, never sqlx's own.
const APP_TABLES: &str = "SELECT table_name FROM information_schema.tables
     WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
       AND table_name <> '_sqlx_migrations'";

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_primary_keys_are_bigint(pool: PgPool) {
    let ids: Vec<(String, String)> = sqlx::query_as(&format!(
        "SELECT c.table_name::TEXT, c.data_type::TEXT
         FROM information_schema.columns c
         WHERE c.table_schema = 'public' AND c.column_name = 'id'
           AND c.table_name IN ({APP_TABLES})"
    ))
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(ids.len(), 6, "one id per table: {ids:?}");
    let wrong: Vec<_> = ids.iter().filter(|(_, ty)| ty != "bigint").collect();
    assert!(wrong.is_empty(), "non-bigint ids: {wrong:?}");
}

/// `created_at` and `updated_at` exist everywhere, as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_audit_timestamps_are_timestamptz(pool: PgPool) {
    let problems: Vec<(String, String)> = sqlx::query_as(&format!(
        "SELECT t.table_name::TEXT, stamp.col
         FROM ({APP_TABLES}) t
         CROSS JOIN (VALUES ('created_at'), ('updated_at')) AS stamp(col)
         WHERE NOT EXISTS (
             SELECT 1 FROM information_schema.columns c
             WHERE c.table_schema = 'public'
               AND c.table_name = t.table_name
               AND c.column_name = stamp.col
               AND c.data_type = 'timestamp with time zone'
         )"
    ))
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(problems.is_empty(), "missing or mistyped: {problems:?}");
}

/// Text columns are TEXT.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_text_columns_avoid_varchar(pool: PgPool) {
    let varchar: Vec<(String, String)> = sqlx::query_as(&format!(
        "SELECT c.table_name::TEXT, c.column_name::TEXT
         FROM information_schema.columns c
         WHERE c.table_schema = 'public' AND c.data_type = 'character varying'
           AND c.table_name IN ({APP_TABLES})"
    ))
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(varchar.is_empty(), "varchar columns: {varchar:?}");
}

/// Unique constraints are `uq_` and foreign keys `fk_`, so the API layer can
/// map violations by name.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_constraint_names_follow_prefixes(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT constraint_name, constraint_type
         FROM information_schema.table_constraints
         WHERE table_schema = 'public'
           AND constraint_type IN ('UNIQUE', 'FOREIGN KEY')",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (name, kind) in &rows {
        let prefix = if kind == "UNIQUE" { "uq_" } else { "fk_" };
        assert!(name.starts_with(prefix), "{kind} constraint {name} should start with {prefix}");
    }
}

/// Referencing columns are indexed so deletes on the parent stay cheap.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_key_columns_are_indexed(pool: PgPool) {
    let unindexed: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT kcu.table_name::TEXT, kcu.column_name::TEXT
         FROM information_schema.key_column_usage kcu
         JOIN information_schema.table_constraints tc
           USING (constraint_schema, constraint_name)
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND kcu.table_schema = 'public'
           AND NOT EXISTS (
               SELECT 1 FROM pg_indexes i
               WHERE i.schemaname = 'public'
                 AND i.tablename = kcu.table_name
                 AND i.indexdef LIKE '%(' || kcu.column_name || ')%'
           )",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(unindexed.is_empty(), "foreign keys without an index: {unindexed:?}");
}

/// Every table keeps `updated_at` current through the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_every_table_has_updated_at_trigger(pool: PgPool) {
    let missing: Vec<String> = sqlx::query_scalar(
        "SELECT t.table_name::TEXT
         FROM information_schema.tables t
         WHERE t.table_schema = 'public'
           AND t.table_type = 'BASE TABLE'
           AND t.table_name != '_sqlx_migrations'
           AND NOT EXISTS (
               SELECT 1 FROM information_schema.triggers tr
               WHERE tr.event_object_schema = 'public'
                 AND tr.event_object_table = t.table_name
                 AND tr.trigger_name = 'set_updated_at'
           )",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(missing.is_empty(), "Tables without set_updated_at: {missing:?}");
}
