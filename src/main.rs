use anyhow::Result;
use telops_core::Config;
use telops_weather::WeatherStation;

#[tokio::main]
async fn main() -> Result<()> {
    telops_core::init()?;

    let (config, _) = Config::load_validated()?;
    let station = WeatherStation::from_config(&config.station)?;

    tracing::info!(
        "Polling {} (minimum interval {:?})",
        station.model(),
        station.min_interval()
    );

    for entry in station.metadata().await? {
        println!("{}", entry);
    }

    if let Some(conditions) = station.site_conditions().await {
        println!(
            "ok to open: {} | interlock: {} | moon: {}",
            conditions.ok_to_open, conditions.interlock_reason, conditions.moon
        );
    }

    Ok(())
}
