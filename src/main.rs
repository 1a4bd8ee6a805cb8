//! Client Matrix CLI: load a client table, classify it, chart it and print a summary

use anyhow::{Context, Result};
use clap::Parser;
use client_matrix::{analyze, data, viz, Analysis, Args};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    args.validate()?;

    if args.verbose {
        println!("Client Categorisation Matrix");
        println!("============================\n");
    }

    run(&args)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load the table
    let source = args.source();
    if args.verbose {
        println!("Step 1: Loading data from {source}");
    }
    let df = data::load_table(&source, args.timeout())?;
    if args.verbose {
        println!("{df}");
    }

    // Step 2: Validate, classify, build chart spec and summary
    let analysis = analyze(&df)?;
    println!("✓ Data validated: {} clients", analysis.table.len());

    print_classification(&analysis);
    print_summary(&analysis);

    // Step 3: Outputs
    if let Some(spec_path) = &args.spec {
        let json = analysis.chart.to_json()?;
        std::fs::write(spec_path, json)
            .with_context(|| format!("failed to write {}", spec_path.display()))?;
        println!("\nChart specification saved to: {}", spec_path.display());
    }

    if !args.no_render {
        let render_start = Instant::now();
        viz::render_to_file(&analysis.chart, &args.output, args.scale)?;
        println!("Chart saved to: {}", args.output.display());
        if args.verbose {
            println!(
                "  Rendering time: {:.2}s",
                render_start.elapsed().as_secs_f64()
            );
        }
    }

    if args.verbose {
        println!(
            "\nTotal processing time: {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn print_classification(analysis: &Analysis) {
    println!("\n=== Client Classification ===");
    let width = analysis
        .classified
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Client".len());

    println!("  {:width$} | Quadrant | Risk", "Client");
    println!("  {:-<width$}-|----------|-----", "");
    for client in &analysis.classified {
        println!(
            "  {:width$} | {:8} | {}",
            client.name,
            client.quadrant.name(),
            client.relationship_risk
        );
    }
}

fn print_summary(analysis: &Analysis) {
    let summary = &analysis.summary;

    println!("\n=== Data Summary ===");
    println!("Total Clients: {}", summary.client_count);
    println!("Total Revenue: {}", summary.total_revenue_display());
    println!("High Risk Clients: {}", summary.high_risk_count);
    println!(
        "Avg Strategic Importance: {}",
        summary.mean_importance_display()
    );

    println!("\nQuadrants:");
    for (quadrant, count) in &summary.quadrant_counts {
        println!("  {}: {} clients", quadrant, count);
    }

    println!("\nRisk Level Distribution:");
    for share in &summary.risk_distribution {
        println!("  • {share}");
    }
}
