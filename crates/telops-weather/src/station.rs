//! The weather station: minimum-interval fetch gate plus unit-converted
//! accessors.
//!
//! All fetch cycles run under one async mutex, so two callers never have
//! fetches in flight at the same time. The last good reading is published
//! as one `Arc` swap; readers see either the old snapshot or the new one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use telops_core::{convert, Quantity, StationConfig, Unit, HUMIDITY_UNITS, TEMPERATURE_UNITS};
use tokio::sync::Mutex;

use crate::clean::parse_reading;
use crate::client::{ReadingSource, TelopsClient};
use crate::error::StationError;
use crate::extract::extract;
use crate::types::{MetadataEntry, MetadataValue, RawReading, SiteConditions, TaggedValue};

/// Accessor result: `Err` for a bad request, `Ok(None)` when no reading
/// could be obtained this cycle.
pub type Reading = Result<Option<TaggedValue>, StationError>;

#[derive(Debug, Default)]
struct GateState {
    /// When the last successful fetch finished; `None` forces a fetch
    last_fetch: Option<Instant>,
}

pub struct WeatherStation<S = TelopsClient> {
    model: String,
    source: S,
    min_interval: Duration,
    gate: Mutex<GateState>,
    current: RwLock<Option<Arc<RawReading>>>,
}

impl WeatherStation<TelopsClient> {
    /// Station backed by the telops site described in `config`.
    pub fn from_config(config: &StationConfig) -> Result<Self, StationError> {
        let client = TelopsClient::new(
            &config.uri,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(
            config.model.clone(),
            client,
            Duration::from_secs(config.check_interval_secs),
        ))
    }
}

impl<S: ReadingSource> WeatherStation<S> {
    pub fn new(model: impl Into<String>, source: S, min_interval: Duration) -> Self {
        Self {
            model: model.into(),
            source,
            min_interval,
            gate: Mutex::new(GateState::default()),
            current: RwLock::new(None),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Run the gate. Returns `true` when a usable reading is cached.
    pub async fn check(&self) -> bool {
        self.checked_reading().await.is_some()
    }

    /// When the last successful fetch finished.
    pub async fn last_fetch(&self) -> Option<Instant> {
        self.gate.lock().await.last_fetch
    }

    /// Observation time of the cached reading, without running the gate.
    pub fn obs_time(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .map(|reading| reading.observation_time.clone())
    }

    /// The cached reading, without running the gate.
    pub fn last_reading(&self) -> Option<Arc<RawReading>> {
        self.current.read().clone()
    }

    async fn checked_reading(&self) -> Option<Arc<RawReading>> {
        let mut gate = self.gate.lock().await;

        let due = gate
            .last_fetch
            .map_or(true, |last| last.elapsed() >= self.min_interval);
        if !due {
            tracing::debug!("Within {:?} of last fetch, using cached reading", self.min_interval);
            return self.current.read().clone();
        }

        match self.refresh().await {
            Ok(reading) => {
                tracing::info!(
                    "Weather reading updated (observed {})",
                    reading.observation_time
                );
                let reading = Arc::new(reading);
                *self.current.write() = Some(Arc::clone(&reading));
                gate.last_fetch = Some(Instant::now());
                Some(reading)
            }
            Err(e) => {
                tracing::warn!("Weather fetch failed, keeping previous reading: {}", e);
                None
            }
        }
    }

    async fn refresh(&self) -> Result<RawReading, StationError> {
        let records = self.source.fetch().await?;
        let fields = extract(&records)?;
        parse_reading(&fields)
    }

    async fn tagged(
        &self,
        unit_in: Unit,
        unit_out: Unit,
        pick: impl Fn(&RawReading) -> Option<f64>,
    ) -> Reading {
        let Some(reading) = self.checked_reading().await else {
            return Ok(None);
        };
        let Some(raw) = pick(reading.as_ref()) else {
            return Ok(None);
        };
        Ok(Some(TaggedValue {
            observation_time: reading.observation_time.clone(),
            value: convert(raw, unit_in, unit_out)?,
            unit: unit_out,
        }))
    }

    pub async fn temperature(&self, unit: Unit) -> Reading {
        require_one_of(unit, TEMPERATURE_UNITS, "temperature")?;
        self.tagged(Unit::Celsius, unit, |r| Some(r.temperature))
            .await
    }

    pub async fn humidity(&self, unit: Unit) -> Reading {
        require_one_of(unit, HUMIDITY_UNITS, "humidity")?;
        self.tagged(Unit::Percent, unit, |r| Some(r.humidity)).await
    }

    pub async fn wind_speed(&self, unit: Unit) -> Reading {
        require_quantity(unit, Quantity::Speed)?;
        self.tagged(Unit::MetersPerSecond, unit, |r| Some(r.wind_speed))
            .await
    }

    /// Wind direction; `Ok(None)` also when the compass code was not recognised.
    pub async fn wind_direction(&self, unit: Unit) -> Reading {
        require_quantity(unit, Quantity::Angle)?;
        self.tagged(Unit::Degree, unit, |r| r.wind_direction).await
    }

    pub async fn pressure(&self, unit: Unit) -> Reading {
        require_quantity(unit, Quantity::Pressure)?;
        self.tagged(Unit::MillimetersOfMercury, unit, |r| Some(r.pressure))
            .await
    }

    pub fn dew_point(&self, _unit: Unit) -> Reading {
        Err(StationError::Unsupported("dew point"))
    }

    pub fn rain(&self, _unit: Unit) -> Reading {
        Err(StationError::Unsupported("rain rate"))
    }

    /// Textual site status from the same table, behind the same gate.
    pub async fn site_conditions(&self) -> Option<SiteConditions> {
        self.checked_reading()
            .await
            .map(|reading| reading.conditions.clone())
    }

    /// Header cards describing the current conditions.
    ///
    /// Each reading card runs the gate on its own, so with the station
    /// unreachable one call makes a failed fetch attempt per card.
    pub async fn metadata(&self) -> Result<Vec<MetadataEntry>, StationError> {
        fn card(key: &'static str, value: Option<TaggedValue>, comment: &'static str) -> MetadataEntry {
            MetadataEntry {
                key,
                value: value.map_or(MetadataValue::Missing, MetadataValue::Reading),
                comment,
            }
        }

        let mut entries = vec![MetadataEntry {
            key: "ENVMOD",
            value: MetadataValue::Text(self.model.clone()),
            comment: "Weather station Model",
        }];
        entries.push(card(
            "ENVTEM",
            self.temperature(Unit::Celsius).await?,
            "[degC] Weather station temperature",
        ));
        entries.push(card(
            "ENVHUM",
            self.humidity(Unit::Percent).await?,
            "[%] Weather station relative humidity",
        ));
        entries.push(card(
            "ENVWIN",
            self.wind_speed(Unit::MetersPerSecond).await?,
            "[m/s] Weather station wind speed",
        ));
        entries.push(card(
            "ENVDIR",
            self.wind_direction(Unit::Degree).await?,
            "[deg] Weather station wind direction",
        ));
        entries.push(card(
            "ENVPRE",
            self.pressure(Unit::MillimetersOfMercury).await?,
            "[mmHg] Weather station air pressure",
        ));
        entries.push(MetadataEntry {
            key: "ENVDAT",
            value: self
                .obs_time()
                .map_or(MetadataValue::Missing, MetadataValue::Text),
            comment: "UT time of the meteo observation",
        });

        Ok(entries)
    }
}

fn require_one_of(unit: Unit, accepted: &[Unit], quantity: &'static str) -> Result<(), StationError> {
    if accepted.contains(&unit) {
        Ok(())
    } else {
        Err(StationError::InvalidUnit { quantity, unit })
    }
}

fn require_quantity(unit: Unit, quantity: Quantity) -> Result<(), StationError> {
    if unit.quantity() == quantity {
        Ok(())
    } else {
        Err(StationError::InvalidUnit {
            quantity: quantity.name(),
            unit,
        })
    }
}
