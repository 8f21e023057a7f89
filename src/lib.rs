// src/lib.rs

pub mod cli;
pub mod component;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod events;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{BootFile, RunConfig, build_registry, load_and_validate};
use crate::dag::DependencyGraph;
use crate::engine::BootRuntime;
use crate::events::{EventBus, spawn_json_subscriber, spawn_log_subscriber};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - boot definition loading and CLI overrides
/// - component registry with simulated initializers
/// - event bus + one subscriber (log or JSON)
/// - the boot runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let file = load_and_validate(&config_path)?;
    let run_config = effective_run_config(&args, &file.run);
    run_config.validate()?;

    if args.dry_run {
        print_dry_run(&file, &run_config)?;
        return Ok(());
    }

    let registry = build_registry(&file)?;
    let bus = EventBus::default();
    let subscriber = if args.json {
        spawn_json_subscriber(&bus)
    } else {
        spawn_log_subscriber(&bus)
    };

    let runtime = BootRuntime::new(&registry, &run_config, Arc::new(bus.clone()))?;
    let report = runtime.run_report().await;

    // The subscriber stops by itself after the summary event.
    drop(bus);
    if let Err(e) = subscriber.await {
        debug!(error = %e, "event subscriber ended abnormally");
    }

    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    }

    let report = report.into_result()?;
    let failures = report.failures();
    for failure in &failures {
        warn!(error = %failure, "component did not become ready");
    }
    let not_ready = failures.len();
    if not_ready > 0 {
        bail!("{not_ready} component(s) did not become ready");
    }

    info!(ready = report.summary.ready, "all components ready");
    Ok(())
}

/// Apply CLI overrides on top of `[run]`. Produces a new value; the file's
/// config is left untouched.
pub fn effective_run_config(args: &CliArgs, base: &RunConfig) -> RunConfig {
    let mut cfg = base.clone();
    if let Some(cap) = args.parallelism {
        cfg.parallelism_cap = cap;
    }
    if let Some(ms) = args.timeout_ms {
        cfg.timeout_ms = ms;
    }
    if let Some(ms) = args.delay_ms {
        cfg.component_delay_ms = ms;
    }
    if !args.only.is_empty() {
        cfg.included_component_ids = args.only.clone();
    }
    cfg
}

/// Dry-run output: print the run config, the components and one valid
/// boot order.
fn print_dry_run(file: &BootFile, run: &RunConfig) -> Result<()> {
    let registry = build_registry(file)?;
    let selected = registry.select(&run.included_component_ids)?;
    let graph = DependencyGraph::build(selected.iter().map(|e| &e.component))?;

    println!("bootdag dry-run");
    println!("  run.enabled = {}", run.enabled);
    println!("  run.timeout_ms = {}", run.timeout_ms);
    println!("  run.component_delay_ms = {}", run.component_delay_ms);
    println!("  run.parallelism_cap = {}", run.parallelism_cap);
    println!();

    println!("components ({}):", selected.len());
    for entry in &selected {
        let c = &entry.component;
        println!("  - {} ({})", c.id(), c.name());
        if !c.description().is_empty() {
            println!("      description: {}", c.description());
        }
        if !c.dependencies().is_empty() {
            println!("      after: {:?}", c.dependencies());
        }
        for child in c.children() {
            println!("      child: {} ({})", child.id(), child.name());
        }
    }
    println!();

    println!("boot order:");
    for (i, id) in graph.boot_order()?.iter().enumerate() {
        println!("  {}. {id}", i + 1);
    }

    debug!("dry-run complete (nothing initialized)");
    Ok(())
}
