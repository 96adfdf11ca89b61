use nonstop_engine::PLUGIN_INFO;
use nonstop_runner::{ContinuitySimulation, RunnerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional JSON config path as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            RunnerConfig::from_file(&path)?
        }
        None => RunnerConfig::default(),
    };

    log::info!("{} v{}: {}", PLUGIN_INFO.name, PLUGIN_INFO.version, PLUGIN_INFO.description);
    log::info!(
        "Feeder: {}, symbols: {}, simulated seconds: {}",
        config.primary_feed,
        config.symbols.len(),
        config.duration
    );

    let report = ContinuitySimulation::new(config).run().await?;
    for (symbol, count) in &report.fake_by_symbol {
        log::info!("{}: {} fake rate(s)", symbol, count);
    }

    Ok(())
}
