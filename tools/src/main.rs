//! datagen: headless loader runner for finforge.
//!
//! Usage:
//!   datagen --db finance.db --mode replace --customers 1000 \
//!           --accounts-per-customer 2 --transactions-per-account 50
//!   datagen --db finance.db --mode merge --customers 15 \
//!           --accounts-per-customer 3 --transactions-per-account 20 --json

use finforge_core::{
    DataStore, FieldSynthesizer, GenConfig, LoadEngine, LoadError, LoadMode, RunReport,
    TargetShape,
};
use std::env;
use std::path::Path;
use std::process::ExitCode;

// Exit codes per fatal error kind, so schedulers can distinguish them.
const EXIT_INVALID_TARGET: u8 = 2;
const EXIT_STORE_UNAVAILABLE: u8 = 3;
const EXIT_SYNTHESIS: u8 = 4;
const EXIT_MISMATCH: u8 = 5;
const EXIT_OTHER: u8 = 1;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("run failed: {e:#}");
            eprintln!("datagen: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let db = str_arg(args, "--db", "finance.db");
    let mode_str = str_arg(args, "--mode", "replace");
    let seed = parse_arg(args, "--seed", 42u64)?;
    let customers = parse_arg(args, "--customers", 1000i64)?;
    let accounts = parse_arg(args, "--accounts-per-customer", 2i64)?;
    let transactions = parse_arg(args, "--transactions-per-account", 50i64)?;
    let json_output = args.iter().any(|a| a == "--json");

    let mode = LoadMode::parse(&mode_str)
        .ok_or_else(|| anyhow::anyhow!("unknown mode '{mode_str}' (replace|insert|merge)"))?;
    let target = TargetShape::new(customers, accounts, transactions);
    log::info!(
        "loading {db} mode={} seed={seed} target=({customers}, {accounts}, {transactions})",
        mode.as_str()
    );

    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => GenConfig::from_json_file(Path::new(&w[1]))?,
        None => GenConfig::default(),
    };

    let store = DataStore::open(&db)?;
    store.migrate()?;

    let mut engine = LoadEngine::new(store, FieldSynthesizer::new(seed, config));
    let report = engine.run(mode, target)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("=== LOAD SUMMARY ===");
    println!("  mode:         {}", report.mode.as_str());
    println!(
        "  target:       ({}, {}, {})",
        report.target.customers,
        report.target.accounts_per_customer,
        report.target.transactions_per_account
    );
    println!("  created:      {} customers, {} accounts, {} transactions",
        report.created.customers, report.created.accounts, report.created.transactions);
    println!("  deleted:      {} customers, {} accounts, {} transactions",
        report.deleted.customers, report.deleted.accounts, report.deleted.transactions);
    println!("  final shape:  {} customers, {} accounts, {} transactions",
        report.final_shape.customers, report.final_shape.accounts, report.final_shape.transactions);
}

fn print_usage() {
    println!("datagen — synthetic finance data loader");
    println!();
    println!("  --db PATH                       database file (default finance.db)");
    println!("  --mode replace|insert|merge     loading mode (default replace)");
    println!("  --customers N                   customer count (default 1000)");
    println!("  --accounts-per-customer N       accounts per customer (default 2)");
    println!("  --transactions-per-account N    transactions per account (default 50)");
    println!("  --seed S                        field synthesis seed (default 42)");
    println!("  --config FILE                   JSON overrides for value pools");
    println!("  --json                          emit the run report as JSON");
}

fn exit_code_for(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<LoadError>() {
        Some(LoadError::InvalidTargetShape { .. }) => EXIT_INVALID_TARGET,
        Some(LoadError::StoreUnavailable(_)) => EXIT_STORE_UNAVAILABLE,
        Some(LoadError::Synthesis { .. }) => EXIT_SYNTHESIS,
        Some(LoadError::PlanExecutionMismatch { .. }) => EXIT_MISMATCH,
        _ => EXIT_OTHER,
    }
}

fn str_arg(args: &[String], flag: &str, default: &str) -> String {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .unwrap_or_else(|| default.to_string())
}

// Absent flags fall back to the default; a flag that is present but
// unparsable is a hard error, never a silent substitution.
fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> anyhow::Result<T> {
    match args.windows(2).find(|w| w[0] == flag) {
        Some(w) => w[1]
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid value '{}' for {flag}", w[1])),
        None => Ok(default),
    }
}
