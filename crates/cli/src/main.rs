//! # reportgen-cli
//!
//! Command-line interface for building Excel reports from saved definitions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use reportgen_core::{
    CancelToken, DataType, Field, HeaderIndex, Progress, ProgressObserver, ReportBuilder,
    ReportDefinition, ReportResult, ReportRows,
};
use reportgen_sheet::{ReportWriter, XlsxReadOptions, XlsxSource};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// reportgen - Excel reports from saved report definitions
#[derive(Parser)]
#[command(name = "reportgen")]
#[command(author, version, about = "Build Excel reports from saved definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build a report workbook
    Export {
        /// Report definition (JSON)
        #[arg(value_name = "DEFINITION")]
        definition: PathBuf,

        /// Source workbook, overriding the definition's folder and file
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output workbook, overriding the dated default
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export exactly these columns, in order
        #[arg(short, long, value_delimiter = ',', value_name = "NAME,...")]
        columns: Vec<String>,

        /// Worksheet to read
        #[arg(long)]
        sheet: Option<String>,
    },
    /// List the definition's fields and whether the source has them
    Fields {
        /// Report definition (JSON)
        #[arg(value_name = "DEFINITION")]
        definition: PathBuf,

        /// Source workbook, overriding the definition's folder and file
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// List the report definitions in a folder
    List {
        /// Folder holding `*.json` definitions
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

/// Everything an export needs once arguments are resolved.
#[derive(Debug, Clone)]
struct ExportJob {
    definition: ReportDefinition,
    source: PathBuf,
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Export {
            definition,
            source,
            output,
            columns,
            sheet,
        } => {
            let job = prepare_export(&definition, source, output, &columns, sheet)?;
            run_export_with_progress(job, cli.verbose).await
        }
        Command::Fields { definition, source } => {
            let definition = load_definition(&definition)?;
            let source = source.unwrap_or_else(|| definition.source_path());
            print_fields(&definition, &source)
        }
        Command::List { dir } => print_definitions(&dir),
    }
}

fn load_definition(path: &Path) -> Result<ReportDefinition> {
    ReportDefinition::from_json_file(path)
        .with_context(|| format!("Failed to load report definition: {}", path.display()))
}

/// Apply command-line overrides to a definition.
fn prepare_export(
    definition_path: &Path,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    columns: &[String],
    sheet: Option<String>,
) -> Result<ExportJob> {
    let mut definition = load_definition(definition_path)?;
    if !columns.is_empty() {
        definition
            .reorder(columns)
            .context("Invalid --columns selection")?;
    }
    if sheet.is_some() {
        definition.sheet_name = sheet;
    }

    let source = source.unwrap_or_else(|| definition.source_path());
    let output =
        output.unwrap_or_else(|| definition.export_path(chrono::Local::now().date_naive()));

    Ok(ExportJob {
        definition,
        source,
        output,
    })
}

/// Run an export on a blocking thread, printing progress and honouring Ctrl-C.
async fn run_export_with_progress(job: ExportJob, verbose: bool) -> Result<()> {
    let cancel = CancelToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "Cancelling...".yellow());
            ctrl_c.cancel();
        }
    });

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            print_progress(&event, verbose);
        }
    });

    let output = job.output.clone();
    let rows = tokio::task::spawn_blocking(move || {
        let observer = move |event: Progress| {
            let _ = sender.send(event);
        };
        run_export(&job, &observer, cancel)
    })
    .await
    .context("Export task failed")??;
    printer.await.context("Progress printer failed")?;

    println!(
        "{} {} rows to {}",
        "Wrote".green().bold(),
        rows.data_row_count(),
        output.display()
    );
    Ok(())
}

/// Read the source, build the rows and save the report workbook.
fn run_export(
    job: &ExportJob,
    observer: &dyn ProgressObserver,
    cancel: CancelToken,
) -> Result<ReportRows> {
    let definition = &job.definition;
    let options = XlsxReadOptions::default().with_sheet(definition.sheet_name.clone());
    let source = XlsxSource::open_with_options(&job.source, &options)
        .with_context(|| format!("Failed to read source: {}", job.source.display()))?;

    let headers = HeaderIndex::from_source(&source, definition.header_row)?;
    let catalog = definition
        .bind(&headers)
        .with_context(|| format!("Source {} does not match the report", job.source.display()))?;

    let rows = ReportBuilder::new(&catalog)
        .first_row(definition.first_row)
        .divider_field(definition.divider_field())
        .observer(observer)
        .cancel_token(cancel)
        .build(&source)?;

    if let Some(parent) = job.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    ReportWriter::new(&definition.name, &catalog)
        .sheet_name(definition.sheet_name.clone())
        .header_background(definition.header_background.as_deref())?
        .divider_background(definition.divider_background.as_deref())?
        .save(&rows, &job.output)?;

    Ok(rows)
}

/// One line of the `list` output.
fn describe_definition(path: &Path, definition: &ReportResult<ReportDefinition>) -> String {
    let file = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |f| f.to_string_lossy().to_string());
    match definition {
        Ok(d) => format!(
            "{:<24} {file}  ({} fields, {} exported)",
            d.name,
            d.fields.len(),
            d.fields.iter().filter(|f| f.is_exported()).count()
        ),
        Err(e) => format!("{:<24} {file}  ({e})", "<invalid>"),
    }
}

fn print_definitions(dir: &Path) -> Result<()> {
    let definitions = ReportDefinition::load_dir(dir)
        .with_context(|| format!("Failed to list reports in {}", dir.display()))?;
    if definitions.is_empty() {
        println!("{}", "(no report definitions)".yellow());
        return Ok(());
    }
    for (path, definition) in &definitions {
        let line = describe_definition(path, definition);
        if definition.is_ok() {
            println!("{line}");
        } else {
            println!("{}", line.red());
        }
    }
    Ok(())
}

fn print_progress(event: &Progress, verbose: bool) {
    match event {
        Progress::Row { .. } if !verbose => {}
        Progress::Row { .. } => eprintln!("{event}"),
        Progress::Divider { .. } => eprintln!("{}", event.to_string().cyan()),
        Progress::Status(_) => eprintln!("{}", event.to_string().bold()),
    }
}

fn data_type_label(data_type: DataType) -> &'static str {
    match data_type {
        DataType::String => "string",
        DataType::Date => "date",
        DataType::Other => "other",
    }
}

/// One line of the `fields` listing.
fn describe_field(field: &Field, column: Option<usize>) -> String {
    let position = if field.is_exported() {
        field.export_position.to_string()
    } else {
        "-".to_string()
    };
    let column = column.map_or_else(|| "missing".to_string(), |c| format!("column {c}"));
    format!(
        "{position:>3}  {:<20} {:<24} {:<7} {column}",
        field.export_name,
        field.name,
        data_type_label(field.data_type)
    )
}

fn print_fields(definition: &ReportDefinition, source_path: &Path) -> Result<()> {
    let options = XlsxReadOptions::default().with_sheet(definition.sheet_name.clone());
    let source = XlsxSource::open_with_options(source_path, &options)
        .with_context(|| format!("Failed to read source: {}", source_path.display()))?;
    let headers = HeaderIndex::from_source(&source, definition.header_row)?;

    println!(
        "{} {} ({} fields, sheet '{}')",
        "Report".cyan().bold(),
        definition.name,
        definition.fields.len(),
        source.sheet_name()
    );

    let exported = definition.fields.iter().filter(|f| f.is_exported());
    let excluded = definition.fields.iter().filter(|f| !f.is_exported());
    for field in exported.chain(excluded) {
        let column = headers.position(&field.export_name);
        let line = describe_field(field, column);
        if column.is_some() {
            println!("{line}");
        } else {
            println!("{}", line.red());
        }
    }
    Ok(())
}
