//! # mattergram CLI
//!
//! Command-line interface for the mattergram library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mattergram::cli::Args;
use mattergram::config::ImportConfig;
use mattergram::convert::{Converter, Destination};
use mattergram::export::{self, EXPORT_FILE_NAME};
use mattergram::identity::IdentityMap;
use mattergram::report::TracingReporter;
use mattergram::MigrateError;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), MigrateError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    init_logging(args.debug);

    println!("📦 mattergram v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input_dir.display());
    println!("💾 Output:  {}", args.output_file.display());
    println!();

    export::validate_input_dir(&args.input_dir, &args.config_file)?;

    let config = ImportConfig::load(&args.input_dir.join(&args.config_file))?;
    let telegram = export::load_export(&args.input_dir.join(EXPORT_FILE_NAME))?;
    println!("⏳ Loaded {} messages", telegram.messages.len());

    let reporter = TracingReporter;

    if let Some(log_path) = &args.conversation_log {
        println!("📝 Writing conversation log to {}", log_path.display());
        mattergram::convlog::write_conversation_log(
            log_path,
            &telegram.messages,
            IdentityMap::from_config(&config),
            &reporter,
        )?;
    }

    let destination = Destination::for_export(&telegram, &config)?;
    let conversion =
        Converter::new(&config, destination, &reporter)?.convert(&telegram.messages)?;
    let post_count = conversion.envelopes.len();
    let attachment_count = conversion.attachments.len();

    let lines = conversion.jsonl_lines()?;
    mattergram::archive::write_archive(
        &args.output_file,
        &args.input_dir,
        &lines,
        &conversion.attachments,
        &reporter,
    )?;

    println!();
    println!("✅ Done! Import saved to {}", args.output_file.display());
    println!();
    println!("📊 Summary:");
    println!("   Posts:        {post_count}");
    println!("   Attachments:  {attachment_count}");
    println!("   Total time:   {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
