use std::collections::HashMap;

use sqlx::{postgres::PgRow, PgConnection, Row};

use crate::{
    entities::{LogSheet, LogSheetFields, Stop, StopFields, Trip, TripFields},
    error::{not_found_error, Error},
};

const TRIP_COLUMNS: &str = "id, driver_name, company, truck_number, \
    start_location, start_lat, start_lon, end_location, end_lat, end_lon, \
    current_location, current_lat, current_lon, \
    total_miles, start_time, end_time, current_cycle_hours";

const STOP_COLUMNS: &str = "id, trip_id, location, lat, lon, stop_type, stop_time, duration";

const LOG_SHEET_COLUMNS: &str = "id, trip_id, date, \
    off_duty_hours, sleeper_berth_hours, driving_hours, on_duty_hours";

fn trip_from_row(row: &PgRow) -> Result<Trip, Error> {
    Ok(Trip {
        id: row.try_get("id")?,
        fields: TripFields {
            driver_name: row.try_get("driver_name")?,
            company: row.try_get("company")?,
            truck_number: row.try_get("truck_number")?,
            start_location: row.try_get("start_location")?,
            start_lat: row.try_get("start_lat")?,
            start_lon: row.try_get("start_lon")?,
            end_location: row.try_get("end_location")?,
            end_lat: row.try_get("end_lat")?,
            end_lon: row.try_get("end_lon")?,
            current_location: row.try_get("current_location")?,
            current_lat: row.try_get("current_lat")?,
            current_lon: row.try_get("current_lon")?,
            total_miles: row.try_get("total_miles")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            current_cycle_hours: row.try_get("current_cycle_hours")?,
        },
        stops: vec![],
        logs: vec![],
    })
}

fn stop_from_row(row: &PgRow) -> Result<Stop, Error> {
    let stop_type: String = row.try_get("stop_type")?;

    Ok(Stop {
        id: row.try_get("id")?,
        trip: row.try_get("trip_id")?,
        fields: StopFields {
            location: row.try_get("location")?,
            lat: row.try_get("lat")?,
            lon: row.try_get("lon")?,
            stop_type: stop_type.parse()?,
            stop_time: row.try_get("stop_time")?,
            duration: row.try_get("duration")?,
        },
    })
}

fn log_sheet_from_row(row: &PgRow) -> Result<LogSheet, Error> {
    Ok(LogSheet {
        id: row.try_get("id")?,
        trip: row.try_get("trip_id")?,
        fields: LogSheetFields {
            date: row.try_get("date")?,
            off_duty_hours: row.try_get("off_duty_hours")?,
            sleeper_berth_hours: row.try_get("sleeper_berth_hours")?,
            driving_hours: row.try_get("driving_hours")?,
            on_duty_hours: row.try_get("on_duty_hours")?,
        },
    })
}

/// Distributes stops and log sheets over the trips they belong to.
pub fn attach_children(trips: &mut [Trip], stops: Vec<Stop>, logs: Vec<LogSheet>) {
    let positions: HashMap<i64, usize> = trips
        .iter()
        .enumerate()
        .map(|(position, trip)| (trip.id, position))
        .collect();

    for stop in stops {
        if let Some(&position) = positions.get(&stop.trip) {
            trips[position].stops.push(stop);
        }
    }

    for log in logs {
        if let Some(&position) = positions.get(&log.trip) {
            trips[position].logs.push(log);
        }
    }
}

// trips

#[tracing::instrument(skip(conn))]
pub async fn fetch_trips(conn: &mut PgConnection) -> Result<Vec<Trip>, Error> {
    let query = format!("SELECT {} FROM trips ORDER BY id", TRIP_COLUMNS);
    let mut trips = sqlx::query(&query)
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(trip_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    let stops = fetch_stops(conn).await?;
    let logs = fetch_log_sheets(conn).await?;
    attach_children(&mut trips, stops, logs);

    Ok(trips)
}

/// Loads the trip row alone, without its stops and log sheets.
#[tracing::instrument(skip(conn))]
pub async fn fetch_trip_row(conn: &mut PgConnection, id: i64) -> Result<Trip, Error> {
    let query = format!("SELECT {} FROM trips WHERE id = $1", TRIP_COLUMNS);
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(not_found_error)?;

    trip_from_row(&row)
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_trip(conn: &mut PgConnection, id: i64) -> Result<Trip, Error> {
    let mut trip = fetch_trip_row(conn, id).await?;

    let query = format!("SELECT {} FROM stops WHERE trip_id = $1 ORDER BY id", STOP_COLUMNS);
    trip.stops = sqlx::query(&query)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(stop_from_row)
        .collect::<Result<_, _>>()?;

    let query = format!(
        "SELECT {} FROM log_sheets WHERE trip_id = $1 ORDER BY id",
        LOG_SHEET_COLUMNS
    );
    trip.logs = sqlx::query(&query)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(log_sheet_from_row)
        .collect::<Result<_, _>>()?;

    Ok(trip)
}

#[tracing::instrument(skip(conn))]
pub async fn insert_trip(conn: &mut PgConnection, fields: &TripFields) -> Result<i64, Error> {
    let row = sqlx::query(
        "INSERT INTO trips (driver_name, company, truck_number, \
            start_location, start_lat, start_lon, end_location, end_lat, end_lon, \
            current_location, current_lat, current_lon, \
            total_miles, start_time, end_time, current_cycle_hours) \
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
        RETURNING id",
    )
    .bind(&fields.driver_name)
    .bind(&fields.company)
    .bind(&fields.truck_number)
    .bind(&fields.start_location)
    .bind(fields.start_lat)
    .bind(fields.start_lon)
    .bind(&fields.end_location)
    .bind(fields.end_lat)
    .bind(fields.end_lon)
    .bind(&fields.current_location)
    .bind(fields.current_lat)
    .bind(fields.current_lon)
    .bind(fields.total_miles)
    .bind(fields.start_time)
    .bind(fields.end_time)
    .bind(fields.current_cycle_hours)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.try_get("id")?)
}

#[tracing::instrument(skip(conn))]
pub async fn update_trip(
    conn: &mut PgConnection,
    id: i64,
    fields: &TripFields,
) -> Result<(), Error> {
    let result = sqlx::query(
        "UPDATE trips SET driver_name = $2, company = $3, truck_number = $4, \
            start_location = $5, start_lat = $6, start_lon = $7, \
            end_location = $8, end_lat = $9, end_lon = $10, \
            current_location = $11, current_lat = $12, current_lon = $13, \
            total_miles = $14, start_time = $15, end_time = $16, current_cycle_hours = $17 \
        WHERE id = $1",
    )
    .bind(id)
    .bind(&fields.driver_name)
    .bind(&fields.company)
    .bind(&fields.truck_number)
    .bind(&fields.start_location)
    .bind(fields.start_lat)
    .bind(fields.start_lon)
    .bind(&fields.end_location)
    .bind(fields.end_lat)
    .bind(fields.end_lon)
    .bind(&fields.current_location)
    .bind(fields.current_lat)
    .bind(fields.current_lon)
    .bind(fields.total_miles)
    .bind(fields.start_time)
    .bind(fields.end_time)
    .bind(fields.current_cycle_hours)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found_error());
    }

    Ok(())
}

// stops

#[tracing::instrument(skip(conn))]
pub async fn fetch_stops(conn: &mut PgConnection) -> Result<Vec<Stop>, Error> {
    let query = format!("SELECT {} FROM stops ORDER BY id", STOP_COLUMNS);

    sqlx::query(&query)
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(stop_from_row)
        .collect()
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_stop(conn: &mut PgConnection, id: i64) -> Result<Stop, Error> {
    let query = format!("SELECT {} FROM stops WHERE id = $1", STOP_COLUMNS);
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(not_found_error)?;

    stop_from_row(&row)
}

#[tracing::instrument(skip(conn))]
pub async fn insert_stop(
    conn: &mut PgConnection,
    trip_id: i64,
    fields: &StopFields,
) -> Result<i64, Error> {
    let row = sqlx::query(
        "INSERT INTO stops (trip_id, location, lat, lon, stop_type, stop_time, duration) \
        VALUES ($1, $2, $3, $4, $5, $6, $7) \
        RETURNING id",
    )
    .bind(trip_id)
    .bind(&fields.location)
    .bind(fields.lat)
    .bind(fields.lon)
    .bind(fields.stop_type.name())
    .bind(fields.stop_time)
    .bind(fields.duration)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.try_get("id")?)
}

#[tracing::instrument(skip(conn))]
pub async fn update_stop(
    conn: &mut PgConnection,
    id: i64,
    trip_id: i64,
    fields: &StopFields,
) -> Result<(), Error> {
    let result = sqlx::query(
        "UPDATE stops SET trip_id = $2, location = $3, lat = $4, lon = $5, \
            stop_type = $6, stop_time = $7, duration = $8 \
        WHERE id = $1",
    )
    .bind(id)
    .bind(trip_id)
    .bind(&fields.location)
    .bind(fields.lat)
    .bind(fields.lon)
    .bind(fields.stop_type.name())
    .bind(fields.stop_time)
    .bind(fields.duration)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found_error());
    }

    Ok(())
}

// log sheets

#[tracing::instrument(skip(conn))]
pub async fn fetch_log_sheets(conn: &mut PgConnection) -> Result<Vec<LogSheet>, Error> {
    let query = format!("SELECT {} FROM log_sheets ORDER BY id", LOG_SHEET_COLUMNS);

    sqlx::query(&query)
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(log_sheet_from_row)
        .collect()
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_log_sheet(conn: &mut PgConnection, id: i64) -> Result<LogSheet, Error> {
    let query = format!("SELECT {} FROM log_sheets WHERE id = $1", LOG_SHEET_COLUMNS);
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(not_found_error)?;

    log_sheet_from_row(&row)
}

#[tracing::instrument(skip(conn))]
pub async fn insert_log_sheet(
    conn: &mut PgConnection,
    trip_id: i64,
    fields: &LogSheetFields,
) -> Result<i64, Error> {
    let row = sqlx::query(
        "INSERT INTO log_sheets (trip_id, date, \
            off_duty_hours, sleeper_berth_hours, driving_hours, on_duty_hours) \
        VALUES ($1, $2, $3, $4, $5, $6) \
        RETURNING id",
    )
    .bind(trip_id)
    .bind(fields.date)
    .bind(fields.off_duty_hours)
    .bind(fields.sleeper_berth_hours)
    .bind(fields.driving_hours)
    .bind(fields.on_duty_hours)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.try_get("id")?)
}

#[tracing::instrument(skip(conn))]
pub async fn update_log_sheet(
    conn: &mut PgConnection,
    id: i64,
    trip_id: i64,
    fields: &LogSheetFields,
) -> Result<(), Error> {
    let result = sqlx::query(
        "UPDATE log_sheets SET trip_id = $2, date = $3, \
            off_duty_hours = $4, sleeper_berth_hours = $5, driving_hours = $6, on_duty_hours = $7 \
        WHERE id = $1",
    )
    .bind(id)
    .bind(trip_id)
    .bind(fields.date)
    .bind(fields.off_duty_hours)
    .bind(fields.sleeper_berth_hours)
    .bind(fields.driving_hours)
    .bind(fields.on_duty_hours)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found_error());
    }

    Ok(())
}

/// Deletes a row by id from one of the trip log tables.
#[tracing::instrument(skip(conn))]
pub async fn delete_row(conn: &mut PgConnection, table: &str, id: i64) -> Result<(), Error> {
    let query = format!("DELETE FROM {} WHERE id = $1", table);
    let result = sqlx::query(&query).bind(id).execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        return Err(not_found_error());
    }

    Ok(())
}
