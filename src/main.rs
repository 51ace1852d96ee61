// src/main.rs
mod utils;
mod extractors;
mod render;
mod report;
mod storage;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use extractors::segment::{count_skipped, scan_lines, Segment, SegmentExtractor, SegmentKind};
use render::OutputFormat;
use report::ReportClient;
use storage::{FieldSummary, RunMetadata, StorageManager};
use utils::AppError;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Extracts titled sections from company-analysis report text
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "report_id"])))]
struct Args {
    /// Report text file to parse ("-" reads stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Company-analysis report id to fetch from the API
    #[arg(short, long, allow_negative_numbers = true)]
    report_id: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Directory for rendered output and metadata (prints to stdout if omitted)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Debug mode - save annotated HTML showing how each line was classified
    #[arg(short, long, requires = "output_dir")]
    debug: bool,

    /// Base URL of the report API
    #[arg(long, env = "REPORT_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Access token sent as the `accessToken` cookie
    #[arg(long, env = "REPORT_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

/// Report text gathered from one source, before parsing.
struct LoadedReport {
    key: String,
    metadata: RunMetadata,
    fields: Vec<(String, Option<String>)>,
}

fn read_input(path: &Path) -> Result<LoadedReport, AppError> {
    let (key, text) = if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        ("stdin".to_string(), text)
    } else {
        let text = std::fs::read_to_string(path)?;
        let key = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        (key, text)
    };
    tracing::info!("Read {} bytes from {}", text.len(), path.display());

    Ok(LoadedReport {
        metadata: RunMetadata {
            source: path.display().to_string(),
            company_name: None,
            report_title: None,
            report_date: None,
            categories: Vec::new(),
            format: String::new(),
            fields: Vec::new(),
        },
        fields: vec![("report".to_string(), Some(text))],
        key,
    })
}

async fn fetch_report(args: &Args, id: i64) -> Result<LoadedReport, AppError> {
    let client = ReportClient::new(&args.base_url, args.access_token.clone())?;
    let detail = client.fetch_detail(id).await?;

    let fields: Vec<(String, Option<String>)> = detail
        .disclosure_fields()
        .into_iter()
        .map(|(name, text)| (name.to_string(), text.map(str::to_string)))
        .collect();
    if fields.iter().all(|(_, text)| text.is_none()) {
        tracing::warn!("Report {} has no disclosure text; output will be empty", detail.company_analysis_id);
    }

    Ok(LoadedReport {
        key: format!("report-{}", detail.company_analysis_id),
        metadata: RunMetadata {
            source: format!("{}/api/v1/company-analysis/{}", args.base_url.trim_end_matches('/'), id),
            company_name: Some(detail.company_name.clone()),
            report_title: detail.company_analysis_title.clone(),
            report_date: detail.created_date().map(|d| d.to_string()),
            categories: detail.dart_category.clone().unwrap_or_default(),
            format: String::new(),
            fields: Vec::new(),
        },
        fields,
    })
}

fn summarize(field: &str, text: Option<&str>, segments: &[Segment]) -> FieldSummary {
    let skipped_lines = text.map(|t| count_skipped(&scan_lines(t))).unwrap_or(0);

    FieldSummary {
        field: field.to_string(),
        present: text.is_some(),
        segment_count: segments.len(),
        title_count: segments.iter().filter(|s| s.kind == SegmentKind::Title).count(),
        skipped_lines,
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: input={:?} report_id={:?} format={:?}", args.input, args.report_id, args.format);

    // 3. Load report text
    // The required "source" group means a missing --input comes with a --report-id.
    let mut loaded = if let Some(path) = &args.input {
        read_input(path)?
    } else {
        fetch_report(&args, args.report_id.unwrap_or_default()).await?
    };
    loaded.metadata.format = format!("{:?}", args.format).to_lowercase();

    // 4. Initialize storage if writing to disk
    let storage = match &args.output_dir {
        Some(dir) => Some(StorageManager::new(dir)?),
        None => None,
    };

    // 5. Parse and render each field
    let extractor = SegmentExtractor::new();
    let mut parsed: Vec<(String, Vec<Segment>)> = Vec::new();

    for (field, text) in &loaded.fields {
        let segments = extractor.extract(field, text.as_deref());
        tracing::info!("Parsed '{}': {} segments", field, segments.len());
        loaded.metadata.fields.push(summarize(field, text.as_deref(), &segments));

        if let Some(storage) = &storage {
            let rendered = render::render(&segments, args.format)?;
            storage.save_rendered(&loaded.key, field, args.format, &rendered)?;

            if args.debug {
                let debug_path = storage.target_dir(&loaded.key).join(format!("{}_annotated.html", field));
                let lines = text.as_deref().map(scan_lines).unwrap_or_default();
                if let Err(e) = utils::html_debug::save_debug_html(&lines, &debug_path) {
                    tracing::warn!("Failed to create debug HTML: {}", e);
                }
            }
        }

        parsed.push((field.clone(), segments));
    }

    // 6. Write metadata, or print to stdout
    match &storage {
        Some(storage) => {
            let path = storage.save_metadata(&loaded.key, &loaded.metadata)?;
            tracing::info!("Saved run metadata to: {}", path.display());
        }
        None => print_fields(&parsed, args.format)?,
    }

    let total: usize = parsed.iter().map(|(_, s)| s.len()).sum();
    tracing::info!("Processing finished. {} fields, {} segments", parsed.len(), total);

    Ok(())
}

fn print_fields(parsed: &[(String, Vec<Segment>)], format: OutputFormat) -> Result<(), AppError> {
    if let [(_, segments)] = parsed {
        println!("{}", render::render(segments, format)?.trim_end());
        return Ok(());
    }

    if format == OutputFormat::Json {
        println!("{}", render::fields_to_json(parsed)?);
        return Ok(());
    }

    for (field, segments) in parsed {
        println!("--- {} ---", field);
        println!("{}", render::render(segments, format)?);
    }
    Ok(())
}
