//! Bill impact CLI: config loading, projection run, and report output.

use std::io;
use std::path::Path;
use std::process;

use serde::Serialize;
use tracing::info;

use bill_impact::config::ProjectionConfig;
use bill_impact::headroom::{self, DEFAULT_WEATHER_SEED, Headroom, PeakHour, ShiftingSummary};
use bill_impact::io::export_csv;
use bill_impact::model::summary::SummaryStats;
use bill_impact::model::trajectory::{ProjectionEngine, TrajectorySet};
use bill_impact::model::types::Scenario;
use bill_impact::presets::{self, MarketType, UtilityPreset};

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    utility: Option<String>,
    dc_mw: Option<f64>,
    years: Option<usize>,
    csv_out: Option<String>,
    json: bool,
    headroom: bool,
}

fn print_help() {
    eprintln!("bill-impact: residential bill impact projections for large data-center loads");
    eprintln!();
    eprintln!("Usage: bill-impact [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load projection from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ProjectionConfig::PRESETS.join(", ")
    );
    eprintln!("  --utility <id>           Start from a catalog utility (see --list-utilities)");
    eprintln!("  --dc-mw <MW>             Resize the data center, keeping its generation ratio");
    eprintln!("  --years <n>              Override projection horizon");
    eprintln!("  --csv <path>             Export trajectories to CSV");
    eprintln!("  --json                   Print trajectories and summary as JSON");
    eprintln!("  --headroom               Also report peak-day grid headroom");
    eprintln!("  --list-utilities         List catalog utilities and exit");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the default preset is used.");
    eprintln!("--utility also resizes the data center to the utility's typical proposal");
    eprintln!("unless --dc-mw is given. Set RUST_LOG=debug for per-year detail.");
}

fn list_utilities() {
    for (region, utilities) in presets::utilities_by_region() {
        println!("{region}:");
        for u in utilities {
            println!(
                "  {:<22} {:<40} {:<10} {:>6.0} MW typical DC",
                u.id,
                u.label(),
                u.market_type.id(),
                u.default_dc_mw
            );
        }
    }
    println!();
    println!("Markets:");
    for market in MarketType::ALL {
        println!("  {:<10} {}", market.id(), market.notes());
    }
}

fn require_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        utility: None,
        dc_mw: None,
        years: None,
        csv_out: None,
        json: false,
        headroom: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--list-utilities" => {
                list_utilities();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                cli.config_path = Some(require_value(&args, i, "--config", "a path argument").into());
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(require_value(&args, i, "--preset", "a name argument").into());
            }
            "--utility" => {
                i += 1;
                cli.utility = Some(require_value(&args, i, "--utility", "an id argument").into());
            }
            "--dc-mw" => {
                i += 1;
                let v = require_value(&args, i, "--dc-mw", "a number argument");
                match v.parse::<f64>() {
                    Ok(mw) if mw > 0.0 => cli.dc_mw = Some(mw),
                    _ => {
                        eprintln!("error: --dc-mw value \"{v}\" is not a positive number");
                        process::exit(1);
                    }
                }
            }
            "--years" => {
                i += 1;
                let v = require_value(&args, i, "--years", "a usize argument");
                if let Ok(n) = v.parse::<usize>() {
                    cli.years = Some(n);
                } else {
                    eprintln!("error: --years value \"{v}\" is not a valid usize");
                    process::exit(1);
                }
            }
            "--csv" => {
                i += 1;
                cli.csv_out = Some(require_value(&args, i, "--csv", "a path argument").into());
            }
            "--json" => cli.json = true,
            "--headroom" => cli.headroom = true,
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Everything the JSON report carries.
#[derive(Serialize)]
struct JsonReport<'a> {
    utility: Option<&'a UtilityPreset>,
    market: &'static str,
    trajectories: &'a TrajectorySet,
    summary: &'a SummaryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    headroom: Option<HeadroomReport>,
}

#[derive(Serialize)]
struct HeadroomReport {
    peak_day: Vec<PeakHour>,
    shifting: ShiftingSummary,
}

fn headroom_report(config: &ProjectionConfig) -> HeadroomReport {
    let envelope = Headroom::new(&config.utility, &config.datacenter);
    let peak_day = headroom::peak_day_profile(&config.utility, &config.datacenter);
    let curve =
        headroom::load_duration_curve(&config.utility, &config.datacenter, DEFAULT_WEATHER_SEED);
    let shifting = ShiftingSummary::from_views(&envelope, &peak_day, &curve);
    HeadroomReport { peak_day, shifting }
}

fn print_table(set: &TrajectorySet) {
    print!("{:>6}", "year");
    for scenario in Scenario::ALL {
        print!("  {:>18}", scenario.display_name());
    }
    println!();
    for (i, point) in set.baseline.points.iter().enumerate() {
        print!("{:>6}", point.year);
        for scenario in Scenario::ALL {
            let bill = set.get(scenario).points.get(i).map_or(f64::NAN, |p| p.monthly_bill);
            print!("  {:>18.2}", bill);
        }
        println!();
    }
}

fn print_headroom(report: &HeadroomReport) {
    println!("--- Peak Day Headroom ---");
    for h in &report.peak_day {
        let p = h.point;
        println!(
            "{:>5} | base={:>9.0} MW  firm={:>7.0}  flex={:>7.0}  shifted={:>7.0}",
            h.label, p.base_grid_mw, p.firm_dc_mw, p.flex_bonus_mw, p.shifted_mw
        );
    }
    let s = &report.shifting;
    println!(
        "Firm baseline {:.0} MW, flex bonus up to {:.0} MW, {} peak hours shift up to {:.0} MW, \
         {:.0} MWh/yr extra energy",
        s.firm_baseline_mw,
        s.max_flex_bonus_mw,
        s.hours_with_shifting,
        s.peak_shifted_mw,
        s.annual_flex_bonus_mwh
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then default
    let mut config = if let Some(ref path) = cli.config_path {
        match ProjectionConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ProjectionConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ProjectionConfig::default_preset()
    };

    let utility_preset = match cli.utility.as_deref() {
        Some(id) => match presets::utility_by_id(id) {
            Some(u) => Some(u),
            None => {
                eprintln!("error: unknown utility \"{id}\" (see --list-utilities)");
                process::exit(1);
            }
        },
        None => None,
    };
    if let Some(u) = utility_preset {
        u.apply_to(&mut config.utility);
        config.datacenter = config.datacenter.resized(u.default_dc_mw);
    }
    if let Some(mw) = cli.dc_mw {
        config.datacenter = config.datacenter.resized(mw);
    }
    if let Some(years) = cli.years {
        config.projection.years = years;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    info!(
        market = config.utility.market.label(),
        dc_mw = config.datacenter.capacity_mw,
        years = config.projection.years,
        "running projection"
    );

    let engine = ProjectionEngine::new(config.params.clone());
    let trajectories = engine.generate_all(
        &config.utility,
        &config.datacenter,
        Some(config.projection.years),
    );
    let summary = match SummaryStats::from_trajectories(&trajectories, &config.utility) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let headroom_view = cli.headroom.then(|| headroom_report(&config));

    if cli.json {
        let report = JsonReport {
            utility: utility_preset,
            market: config.utility.market.label(),
            trajectories: &trajectories,
            summary: &summary,
            headroom: headroom_view,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                process::exit(1);
            }
        }
    } else {
        if let Some(u) = utility_preset {
            println!("{} ({} market)", u.name, u.market_type.id());
        }
        print_table(&trajectories);
        println!("\n{summary}");
        if let Some(ref report) = headroom_view {
            println!();
            print_headroom(report);
        }
    }

    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_csv(&trajectories, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Trajectories written to {path}");
    }
}
