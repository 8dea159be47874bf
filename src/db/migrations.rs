use anyhow::Context;
use rusqlite::Connection;

// Migrations are embedded at compile time so the binary (and the test suite)
// never depends on the working directory.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_core_tables",
        include_str!("../../migrations/0001_core_tables.sql"),
    ),
    (
        "0002_seed_packages",
        include_str!("../../migrations/0002_seed_packages.sql"),
    ),
    (
        "0003_seed_business_hours",
        include_str!("../../migrations/0003_seed_business_hours.sql"),
    ),
    (
        "0004_users_and_sessions",
        include_str!("../../migrations/0004_users_and_sessions.sql"),
    ),
    (
        "0005_addons",
        include_str!("../../migrations/0005_addons.sql"),
    ),
    (
        "0006_vehicle_prices",
        include_str!("../../migrations/0006_vehicle_prices.sql"),
    ),
];

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("failed to check migration status")?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}
