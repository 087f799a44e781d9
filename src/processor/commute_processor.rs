use crate::config::AppConfig;
use crate::models::row::CommuteRow;
use crate::models::trip::{Location, Trip};
use crate::transit::TripSource;
use crate::warehouse::Warehouse;
use anyhow::Context;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

pub trait Clock {
    fn now(&self, tz: Tz) -> DateTime<Tz>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        Utc::now().with_timezone(&tz)
    }
}

/// Measures origin -> destination, then destination -> origin, writing one row per
/// direction that produced a duration. A failed lookup only skips its own direction;
/// a failed write aborts the run.
pub async fn run<S, W, C>(config: &AppConfig, source: &S, warehouse: &W, clock: &C) -> anyhow::Result<()>
where
    S: TripSource,
    W: Warehouse,
    C: Clock,
{
    let now = clock.now(config.timezone);
    info!(
        "Measuring commute between {} and {} at {}",
        config.origin.name,
        config.destination.name,
        now.to_rfc3339()
    );

    let directions = [
        (&config.origin, &config.destination),
        (&config.destination, &config.origin),
    ];
    for (from, to) in directions {
        measure_direction(config, source, warehouse, clock, from, to, now).await?;
    }

    Ok(())
}

async fn measure_direction<S, W, C>(
    config: &AppConfig,
    source: &S,
    warehouse: &W,
    clock: &C,
    from: &Location,
    to: &Location,
    now: DateTime<Tz>,
) -> anyhow::Result<()>
where
    S: TripSource,
    W: Warehouse,
    C: Clock,
{
    let departure = if config.profile.departs_per_call() {
        clock.now(config.timezone)
    } else {
        now
    };
    let trip = Trip::new(from, to, departure);

    let measurement = source.measure(&trip).await;
    info!("{} will have {}", trip, measurement);

    let row = match CommuteRow::build(config.profile, &trip, &measurement, now) {
        Some(row) => row,
        None => {
            warn!("No duration for {}, nothing stored", trip.direction());
            return Ok(());
        }
    };

    warehouse
        .insert_rows(&config.table, std::slice::from_ref(&row))
        .await
        .with_context(|| format!("Failed to store {} in {}", row.direction(), config.table))?;
    info!(
        "Stored {} ({} s) in {}",
        row.direction(),
        row.duration_sec(),
        config.table
    );

    Ok(())
}
