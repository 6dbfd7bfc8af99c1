use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, Level};

use crate::cli::args::{Cli, Commands};
use crate::cli::prompt::InteractiveSelector;
use crate::error::FetchError;
use crate::fetcher::{Fetcher, FixedSelection, ProductSelector};
use crate::models::{
    plan_periods, BoundingBox, DownloadRequest, InputType, ManualSelection, ProcessingLevel,
    YearMonth,
};
use crate::readers::GridReader;
use crate::remote::{DhusClient, HttpTransfer};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Download {
            mission,
            level,
            parameter,
            start,
            end,
            bbox,
            input_type,
            file_id,
            product_name,
            select,
            output_root,
            quiet,
        } => {
            let settings = Settings::load(cli.config.as_deref())?;
            let input_type = parse_input_type(&input_type, file_id, product_name)?;
            let bbox = parse_bbox(&bbox)?;
            let request = DownloadRequest::parse(
                &mission, &level, &parameter, &start, &end, bbox, input_type,
            )?;

            let output_root = output_root.unwrap_or_else(|| settings.output_root.clone());
            let units = request.periods().len() as u64;

            println!(
                "Downloading {} {} {} into {}",
                request.mission(),
                request.level(),
                request.parameter(),
                output_root.display()
            );

            let hub = DhusClient::new(
                &settings.hub_url,
                &settings.username,
                &settings.password,
                settings.timeout(),
            )?;
            let transfer = HttpTransfer::new(settings.timeout())?;

            let selector: Box<dyn ProductSelector> = match select {
                Some(index) => Box::new(FixedSelection(index)),
                None => Box::new(InteractiveSelector),
            };

            let fetcher = Fetcher::new(hub, transfer, &output_root)
                .with_hub_location(&settings.hub_url)
                .with_l3_base_url(&settings.l3_base_url)
                .with_query_limit(settings.query_limit)
                .with_selector(selector)
                .with_reporter(ProgressReporter::new(units, "Processing periods...", quiet));

            let report = fetcher.run(&request).await?;
            println!("\n{}", report.summary());
        }

        Commands::Plan { level, start, end } => {
            let level = level.parse::<ProcessingLevel>()?;
            let start = parse_date(&start)?;
            let end = parse_date(&end)?;

            let units = plan_periods(level, start, end);
            println!("{} period units for {} {} to {}:", units.len(), level, start, end);
            for unit in units {
                println!("  {}", unit);
            }
        }

        Commands::Inspect { file, month, at } => {
            println!("Decoding L3 grid: {}", file.display());

            let progress = ProgressReporter::new_spinner("Decoding grid...", false);
            let reader = GridReader::new();
            let cube = match month {
                Some(month) => reader.decode(&file, month.parse::<YearMonth>()?),
                None => reader.decode_file(&file),
            }
            .with_context(|| format!("Failed to decode {}", file.display()))?;
            progress.finish_with_message(&format!("Decoded {} cells", cube.values.len()));

            println!("\n{}", cube.summarize().summary());

            if let Some(coords) = at {
                if let [lat, lon] = coords[..] {
                    match cube.value_at(lat, lon) {
                        Some(value) => println!("\nValue at ({}, {}): {:.4e}", lat, lon, value),
                        None => println!("\nValue at ({}, {}): missing", lat, lon),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Exit status for a failed run
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<FetchError>() {
        Some(e) if e.is_configuration() => 2,
        Some(FetchError::DateParse(_)) => 2,
        Some(FetchError::Io(_)) => 3,
        _ => 1,
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    info!("Logging initialised at {}", level);
    Ok(())
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, FetchError> {
    Ok(NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")?)
}

fn parse_bbox(values: &[f64]) -> std::result::Result<BoundingBox, FetchError> {
    match values {
        [lon_min, lon_max, lat_min, lat_max] => {
            BoundingBox::new(*lon_min, *lon_max, *lat_min, *lat_max)
        }
        _ => Err(FetchError::InvalidRequest(format!(
            "Bounding box needs 4 values, got {}",
            values.len()
        ))),
    }
}

fn parse_input_type(
    input_type: &str,
    file_id: Option<String>,
    product_name: Option<String>,
) -> std::result::Result<InputType, FetchError> {
    match input_type.trim().to_lowercase().as_str() {
        "query" => Ok(InputType::Query),
        "manual" => match (file_id, product_name) {
            (Some(file_id), Some(product_name)) => Ok(InputType::Manual(ManualSelection {
                file_id,
                product_name,
            })),
            _ => Err(FetchError::InvalidRequest(
                "Manual mode needs --file-id and --product-name".to_string(),
            )),
        },
        other => Err(FetchError::InvalidRequest(format!(
            "Unknown input type '{}'. Expected manual or query",
            other
        ))),
    }
}
