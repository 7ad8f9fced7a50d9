//! # tgstat CLI
//!
//! Command-line interface for the tgstat library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use tgstat::cli::Args;
use tgstat::config::{ExtractConfig, StatsConfig, TableConfig};
use tgstat::output::{preview_rows, write_sent_received_csv, write_stats_csv};
use tgstat::stats::{Frequency, JoinPolicy, aggregate, sent_received};
use tgstat::table::{build_table, filter_by_date, parse_filter_date};
use tgstat::{Takeout, TgstatError};

const PREVIEW_ROWS: usize = 15;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), TgstatError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let frequency: Frequency = args.freq.into();
    let join: JoinPolicy = args.join.into();

    // Print header
    println!("📊 tgstat v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", args.output);
    println!("📆 Freq:    {}", args.freq);
    if !args.totals {
        println!("🔗 Join:    {}", args.join);
    }

    // Build pipeline configuration
    let mut extract_config = ExtractConfig::new();
    let mut table_config = TableConfig::new().with_replace_links(!args.keep_links);
    if !args.chat_types.is_empty() {
        extract_config = extract_config.with_chat_types(args.chat_types.clone());
        table_config = table_config.with_chat_types(args.chat_types.clone());
        println!(
            "💬 Chats:   {}",
            args.chat_types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let after = args
        .after
        .as_deref()
        .map(parse_filter_date)
        .transpose()?;
    if let Some(ref date) = args.after {
        println!("📅 After:   {}", date);
    }

    let before = args
        .before
        .as_deref()
        .map(parse_filter_date)
        .transpose()?;
    if let Some(ref date) = args.before {
        println!("📅 Before:  {}", date);
    }

    println!();

    // Step 1: Parse the archive
    println!("⏳ Parsing archive...");
    let parse_start = Instant::now();
    let takeout = Takeout::from_path(Path::new(&args.input))?;
    let retained = takeout.chats(&extract_config).count();
    println!(
        "   {} of {} chats retained ({:.2}s)",
        retained,
        takeout.chat_count(),
        parse_start.elapsed().as_secs_f64()
    );

    // Step 2: Flatten into the message table
    println!("🧮 Building message table...");
    let build_start = Instant::now();
    let (rows, table_stats) = build_table(takeout.chats(&extract_config), &table_config);
    println!(
        "   {} rows, {} skipped ({:.2}s)",
        table_stats.produced,
        table_stats.skipped,
        build_start.elapsed().as_secs_f64()
    );

    // Step 3: Date-range restriction
    let rows = if after.is_some() || before.is_some() {
        println!("🔍 Filtering by date...");
        let filtered = filter_by_date(rows, after, before);
        println!("   {} rows after filtering", filtered.len());
        filtered
    } else {
        rows
    };

    if args.preview {
        println!();
        print!("{}", preview_rows(&rows, PREVIEW_ROWS));
        println!();
    }

    // Step 4: Aggregate and write
    if args.totals {
        println!("🧮 Aggregating {} buckets...", frequency);
        let stats_config = StatsConfig::new()
            .with_frequency(frequency)
            .with_exclude_forwarded(args.exclude_forwarded);
        let stats = aggregate(&rows, &stats_config);
        println!("   {} buckets", stats.len());

        println!("💾 Writing {}...", args.output);
        write_stats_csv(&stats, &args.output)?;
    } else {
        let owner_id = takeout.owner_id()?;
        println!("🧮 Aggregating {} sent/received buckets (owner {})...", frequency, owner_id);
        let merged = sent_received(&rows, owner_id, frequency, join);
        println!("   {} merged periods", merged.len());

        println!("💾 Writing {}...", args.output);
        write_sent_received_csv(&merged, &args.output)?;
    }

    println!();
    println!("✅ Done! Output saved to {}", args.output);

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Rows:     {}", rows.len());
    if table_stats.skipped > 0 {
        println!("   Skipped:  {} (unparseable rows)", table_stats.skipped);
    }
    println!("   Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
