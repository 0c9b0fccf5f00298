pub mod cli;
pub mod diff;
pub mod error;
pub mod export;
pub mod mapping;
pub mod parse;
pub mod render;
pub mod session;
pub mod source;
pub mod table;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use crate::cli::{Cli, Commands, CompareArgs, PreviewArgs, ReportFormat};
use crate::diff::DiffKind;
use crate::mapping::ColumnMapping;
use crate::session::{CompareSession, Side};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("table_compare", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare(args) => handle_compare(&args),
        Commands::Preview(args) => handle_preview(&args),
    }
}

fn handle_compare(args: &CompareArgs) -> Result<()> {
    let mut session = CompareSession::new();
    load_side(&mut session, Side::A, args, &args.left, args.left_encoding.as_deref())?;
    load_side(
        &mut session,
        Side::B,
        args,
        &args.right,
        args.right_encoding.as_deref(),
    )?;

    if !args.map.is_empty() {
        let mapping =
            ColumnMapping::parse(&args.map).context("Parsing column mapping arguments")?;
        session.set_mapping(mapping);
    }
    session.set_key_columns(args.keys.clone());

    let records = session.compare().with_context(|| {
        format!("Comparing {:?} against {:?}", args.left, args.right)
    })?;
    for kind in DiffKind::ALL {
        let count = records.iter().filter(|r| r.kind == kind).count();
        if count > 0 {
            info!("{}: {} record(s)", kind.label(), count);
        }
    }

    match &args.output {
        Some(path) => {
            let bytes = match report_format(path, args.format) {
                ReportFormat::Xlsx => {
                    let (unique_a, unique_b) = session.unique_columns()?;
                    export::export_spreadsheet(&records, &unique_a, &unique_b)?
                }
                ReportFormat::Csv => export::export_csv(&records)?,
            };
            fs::write(path, bytes).with_context(|| format!("Writing report to {path:?}"))?;
            info!("Report with {} record(s) written to {path:?}", records.len());
        }
        None => {
            if records.is_empty() {
                info!("No differences found");
            } else {
                print!("{}", render::render_differences(&records));
            }
        }
    }
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let encoding = source::resolve_encoding(args.input_encoding.as_deref())?;
    let loaded = source::load_path(&args.input, args.max_rows, encoding)
        .with_context(|| format!("Loading {:?}", args.input))?;
    for warning in &loaded.warnings {
        warn!("{:?}: {warning}", args.input);
    }
    info!(
        "{:?}: {} column(s), {} row(s)",
        args.input,
        loaded.table.column_count(),
        loaded.table.row_count()
    );
    print!("{}", render::render_preview(&loaded.table, args.rows));
    Ok(())
}

fn load_side(
    session: &mut CompareSession,
    side: Side,
    args: &CompareArgs,
    path: &std::path::Path,
    encoding_label: Option<&str>,
) -> Result<()> {
    let encoding = source::resolve_encoding(encoding_label)?;
    let loaded = source::load_path(path, args.max_rows, encoding)
        .with_context(|| format!("Loading {} from {path:?}", side.label()))?;
    for warning in &loaded.warnings {
        warn!("{}: {warning}", side.label());
    }
    session.load(side, loaded.table);
    Ok(())
}

fn report_format(path: &std::path::Path, forced: Option<ReportFormat>) -> ReportFormat {
    if let Some(format) = forced {
        return format;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ReportFormat::Xlsx,
        _ => ReportFormat::Csv,
    }
}
