//! pcapscope CLI entry point.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcapscope::cli::{Args, Command, OutputFormatter, OverviewReport};
use pcapscope::session::Session;
use pcapscope::storage::SaveMode;
use pcapscope_core::protocol::{default_registry, Protocol};
use pcapscope_core::StackLevel;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_filter().into()),
        )
        .with_writer(io::stderr)
        .init();

    match &args.command {
        Command::Protocols => {
            list_protocols();
            Ok(())
        }
        Command::Slots => {
            let session = open_session(&args.db)?;
            for slot in session.list_slots()? {
                println!("{slot}");
            }
            Ok(())
        }
        Command::Delete { slot } => {
            let mut session = open_session(&args.db)?;
            session
                .delete_slot(slot)
                .with_context(|| format!("Failed to delete slot '{slot}'"))?;
            eprintln!("Deleted slot {slot}");
            Ok(())
        }
        Command::Show { slot } => {
            let mut session = open_session(&args.db)?;
            session
                .load(slot)
                .with_context(|| format!("Failed to load slot '{slot}'"))?;
            print_overview(&args, &session)
        }
        Command::Overview { files } => {
            let mut session = open_session(&args.db)?;
            load_captures(&mut session, files, &args.log_dir)?;
            print_overview(&args, &session)
        }
        Command::Save { slot, replace, files } => {
            let mut session = open_session(&args.db)?;
            load_captures(&mut session, files, &args.log_dir)?;
            let mode = if *replace {
                SaveMode::Replace
            } else {
                SaveMode::Create
            };
            let rows = session
                .save(slot, mode)
                .with_context(|| format!("Failed to save slot '{slot}'"))?;
            eprintln!("Saved {rows} rows to slot {slot}");
            Ok(())
        }
    }
}

fn open_session(db: &Path) -> Result<Session> {
    Session::open(db).with_context(|| format!("Failed to open database: {}", db.display()))
}

fn load_captures(session: &mut Session, files: &[PathBuf], log_dir: &Path) -> Result<()> {
    for file in files {
        session
            .load_capture(file)
            .with_context(|| format!("Failed to classify capture: {}", file.display()))?;
    }
    session
        .write_diagnostics(log_dir)
        .with_context(|| format!("Failed to write logs to {}", log_dir.display()))?;
    Ok(())
}

fn print_overview(args: &Args, session: &Session) -> Result<()> {
    let report = OverviewReport::build(session.table(), args.top, args.intervals)?;
    OutputFormatter::new(args.format).write(&report, &mut io::stdout())?;
    Ok(())
}

fn list_protocols() {
    let registry = default_registry();

    println!("Registered Protocol Decoders:");
    println!("{:-<50}", "");

    for level in StackLevel::ALL {
        println!("{level}");
        for parser in registry.parsers(level) {
            println!("  {} ({})", parser.display_name(), parser.name());
            for field in parser.schema_fields() {
                let nullable = if field.nullable { "nullable" } else { "" };
                println!("    {:<26} {:<22} {}", field.name, field.kind.type_name(), nullable);
            }
        }
    }
}
