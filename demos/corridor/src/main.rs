//! corridor — end-to-end noise damage run over a synthetic road corridor.
//!
//! Loads the run configuration from TOML (embedded default, or the path
//! given as the first argument), builds the corridor inputs, runs the
//! damage pipeline with a CSV event sink, and prints a JSON summary.
//!
//! Set `RUST_LOG=debug` for per-stage progress.

mod scenario;

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nd_core::{NoiseConfig, VehicleCategory};
use nd_damage::{FreeFlowSpeed, HgvSpeedCap, NoiseDamageCalculatorBuilder, SpeedModel};
use nd_exposure::load_activities_reader;
use nd_network::load_links_reader;
use nd_output::{CsvWriter, EventOutputSink};

// ── Configuration ─────────────────────────────────────────────────────────────

const DEFAULT_CONFIG: &str = r#"
[noise]
interval_width_secs = 3600
horizon_secs        = 108000
hgv_id_prefix       = "lkw"
scale_factor        = 1.0
collect_events      = true

[scenario]
hgv_speed_cap_kmh = 60.0

[output]
dir = "output/corridor"
"#;

#[derive(Deserialize, Default)]
#[serde(default)]
struct DemoConfig {
    noise:    NoiseConfig,
    scenario: ScenarioSection,
    output:   OutputSection,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ScenarioSection {
    /// Cap heavy vehicles at this speed; free-flow for everyone if absent.
    hgv_speed_cap_kmh: Option<f64>,
}

#[derive(Deserialize)]
#[serde(default)]
struct OutputSection {
    dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { dir: PathBuf::from("output/corridor") }
    }
}

fn load_config() -> Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            toml::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(toml::from_str(DEFAULT_CONFIG)?),
    }
}

// ── Speed strategy ────────────────────────────────────────────────────────────

enum DemoSpeed {
    FreeFlow(FreeFlowSpeed),
    Capped(HgvSpeedCap),
}

impl From<Option<f64>> for DemoSpeed {
    fn from(cap: Option<f64>) -> Self {
        match cap {
            Some(max_kmh) => DemoSpeed::Capped(HgvSpeedCap::new(max_kmh)),
            None => DemoSpeed::FreeFlow(FreeFlowSpeed),
        }
    }
}

impl SpeedModel for DemoSpeed {
    fn speed_kmh(&self, category: VehicleCategory, freespeed_kmh: f64) -> f64 {
        match self {
            DemoSpeed::FreeFlow(s) => s.speed_kmh(category, freespeed_kmh),
            DemoSpeed::Capped(s) => s.speed_kmh(category, freespeed_kmh),
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    info!("Configuration loaded: {:?}", config.noise);
    let grid = config.noise.grid()?;

    // 1. Inputs.
    let network = load_links_reader(Cursor::new(scenario::LINKS_CSV))?;
    let exposure = load_activities_reader(Cursor::new(scenario::ACTIVITIES_CSV), &grid)?;
    let traffic = scenario::build_traffic(&network, &grid, &config.noise.hgv_id_prefix);
    let receivers = scenario::build_receivers(&network, &grid, &traffic);
    info!(
        "Corridor: {} links, {} receivers, {} link/interval entries, {} occupancies",
        network.link_count(),
        receivers.len(),
        traffic.len(),
        exposure.occupancy_len()
    );

    // 2. Calculator.
    let calc = NoiseDamageCalculatorBuilder::new(
        config.noise.clone(),
        DemoSpeed::from(config.scenario.hgv_speed_cap_kmh),
    )
    .network(network)
    .receivers(receivers)
    .traffic(traffic)
    .exposure(exposure)
    .build()?;

    // 3. Output.
    std::fs::create_dir_all(&config.output.dir)?;
    let mut sink = EventOutputSink::new(CsvWriter::new(&config.output.dir)?);

    // 4. Run.
    let t0 = Instant::now();
    let report = calc.run(&mut sink)?;
    let elapsed = t0.elapsed();

    if let Some(e) = sink.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    let mut link_costs: BTreeMap<String, f64> = BTreeMap::new();
    for (&(link, _), &cost) in &report.allocation.link_totals {
        *link_costs.entry(link.to_string()).or_insert(0.0) += cost;
    }
    let affected: BTreeMap<&str, f64> = report
        .totals
        .affected_by_person
        .iter()
        .map(|(p, &c)| (p.as_str(), c))
        .collect();

    let summary = serde_json::json!({
        "elapsed_secs":          elapsed.as_secs_f64(),
        "receiver_damage_total": report.damage.total(),
        "total_caused":          report.total_caused(),
        "total_affected":        report.total_affected(),
        "caused_events":         report.caused_events.len(),
        "affected_events":       report.affected_events.len(),
        "link_costs":            link_costs,
        "affected_by_person":    affected,
    });

    let summary_path = Path::new(&config.output.dir).join("summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    info!("Wrote {}", summary_path.display());

    Ok(())
}
