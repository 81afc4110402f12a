pub mod cli;
pub mod filter;
pub mod import;
pub mod io_utils;
pub mod lifecycle;
pub mod mapper;
pub mod normalize;
pub mod schema;
pub mod stats;
pub mod store;
pub mod table;
pub mod tabular;
pub mod version;

use std::{collections::BTreeSet, env, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, ClassifyArgs, Commands, ImportArgs, ReleasesArgs, StatsArgs},
    filter::IssueFilter,
    import::RunReport,
    store::Store,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("jira_normalize", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Import(args) => handle_import(&args),
        Commands::Releases(args) => handle_releases(&args),
        Commands::Classify(args) => handle_classify(&args),
        Commands::Stats(args) => handle_stats(&args),
    }
}

fn handle_import(args: &ImportArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Importing issues from '{}' into {:?}",
        args.input.display(),
        args.store
    );
    let text = io_utils::read_input_text(&args.input, encoding)?;
    let mut store = Store::load(&args.store)?;
    let report = import::import_issues(&text, &mut store)
        .with_context(|| format!("Importing issues from {:?}", args.input))?;
    store.save(&args.store)?;
    emit_report(&report, args.json)?;
    if args.strict && report.rejected > 0 {
        return Err(anyhow!(
            "{} row(s) were structurally rejected",
            report.rejected
        ));
    }
    Ok(())
}

fn handle_releases(args: &ReleasesArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Importing releases from '{}' into {:?}",
        args.input.display(),
        args.store
    );
    let text = io_utils::read_input_text(&args.input, encoding)?;
    let mut store = Store::load(&args.store)?;
    let report = import::import_releases(&text, &mut store)
        .with_context(|| format!("Importing releases from {:?}", args.input))?;
    store.save(&args.store)?;
    emit_report(&report, args.json)
}

fn handle_classify(args: &ClassifyArgs) -> Result<()> {
    let store = Store::load(&args.store)?;
    let names = release_universe(&store, args.referenced_only);
    let open = lifecycle::classify(names.iter().map(String::as_str), &store.releases);
    let closed: BTreeSet<String> = names.difference(&open).cloned().collect();

    if args.json {
        let payload = serde_json::json!({ "open": open, "closed": closed });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let headers = vec!["release".to_string(), "status".to_string()];
    let rows = names
        .iter()
        .map(|name| {
            let status = if open.contains(name) { "open" } else { "closed" };
            vec![name.clone(), status.to_string()]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_stats(args: &StatsArgs) -> Result<()> {
    let store = Store::load(&args.store)?;
    let filter = IssueFilter {
        resolved_from: args.from,
        resolved_to: args.to,
        system: args.system.clone(),
        fix_version: args.fix_version.clone(),
        issue_type: args.issue_type.clone(),
    };
    let mut issues = filter.apply(store.issues.values().cloned().collect());

    if args.closed_only {
        let referenced: BTreeSet<String> = issues
            .iter()
            .filter_map(|issue| issue.fix_version.clone())
            .collect();
        let open = lifecycle::classify(referenced.iter().map(String::as_str), &store.releases);
        issues = lifecycle::filter_to_closed_only(issues, &open);
    }

    let summary = stats::release_stats(&issues);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let headers = ["release", "issues", "resolved", "mean_lead_time_days"]
        .map(str::to_string)
        .to_vec();
    let rows = summary
        .iter()
        .map(|entry| {
            vec![
                entry.release.clone(),
                entry.issues.to_string(),
                entry.resolved.to_string(),
                entry
                    .mean_lead_time_days
                    .map(|days| format!("{days:.1}"))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}

/// All release names worth classifying: stored releases plus fix-versions
/// referenced by issues but never imported as releases, unless the caller
/// restricts to the referenced set.
fn release_universe(store: &Store, referenced_only: bool) -> BTreeSet<String> {
    let referenced = store.referenced_releases();
    if referenced_only {
        return referenced;
    }
    store
        .releases
        .keys()
        .cloned()
        .chain(referenced)
        .collect()
}

fn emit_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!(
        "{} inserted, {} updated, {} rejected",
        report.inserted, report.updated, report.rejected
    );
    for error in &report.errors {
        eprintln!("error: {error}");
    }
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
