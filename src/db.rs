use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres};

pub struct PgPool(pub Pool<Postgres>);

impl PgPool {
    #[tracing::instrument(name = "PgPool::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Ok(Self(pool))
    }
}

/// Creates the trip log tables if they do not exist yet.
#[tracing::instrument(skip_all)]
pub async fn migrate(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    pool.execute(
        "CREATE TABLE IF NOT EXISTS trips (
            id BIGSERIAL PRIMARY KEY,
            driver_name VARCHAR(255) NOT NULL,
            company VARCHAR(255),
            truck_number VARCHAR(50),
            start_location VARCHAR(255) NOT NULL,
            start_lat DOUBLE PRECISION,
            start_lon DOUBLE PRECISION,
            end_location VARCHAR(255) NOT NULL,
            end_lat DOUBLE PRECISION,
            end_lon DOUBLE PRECISION,
            current_location VARCHAR(255),
            current_lat DOUBLE PRECISION,
            current_lon DOUBLE PRECISION,
            total_miles DOUBLE PRECISION NOT NULL,
            start_time TIMESTAMPTZ NOT NULL,
            end_time TIMESTAMPTZ,
            current_cycle_hours DOUBLE PRECISION NOT NULL DEFAULT 0
        )",
    )
    .await?;

    pool.execute(
        "CREATE TABLE IF NOT EXISTS stops (
            id BIGSERIAL PRIMARY KEY,
            trip_id BIGINT NOT NULL REFERENCES trips (id) ON DELETE CASCADE,
            location VARCHAR(255) NOT NULL,
            lat DOUBLE PRECISION,
            lon DOUBLE PRECISION,
            stop_type VARCHAR(10) NOT NULL,
            stop_time TIMESTAMPTZ NOT NULL,
            duration DOUBLE PRECISION NOT NULL DEFAULT 0
        )",
    )
    .await?;
    pool.execute("CREATE INDEX IF NOT EXISTS stops_trip_id_idx ON stops (trip_id)")
        .await?;

    pool.execute(
        "CREATE TABLE IF NOT EXISTS log_sheets (
            id BIGSERIAL PRIMARY KEY,
            trip_id BIGINT NOT NULL REFERENCES trips (id) ON DELETE CASCADE,
            date DATE NOT NULL,
            off_duty_hours DOUBLE PRECISION NOT NULL DEFAULT 0,
            sleeper_berth_hours DOUBLE PRECISION NOT NULL DEFAULT 0,
            driving_hours DOUBLE PRECISION NOT NULL DEFAULT 0,
            on_duty_hours DOUBLE PRECISION NOT NULL DEFAULT 0
        )",
    )
    .await?;
    pool.execute("CREATE INDEX IF NOT EXISTS log_sheets_trip_id_idx ON log_sheets (trip_id)")
        .await?;

    Ok(())
}
