use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use smart_finance::{
    ChartRequest, Dataset, Document, Pipeline, PipelineConfig, PriorityCategory, SessionContext,
};

#[derive(Parser)]
#[command(name = "smart-finance")]
#[command(about = "Load CSV/PDF statements, resolve charts and recommendations")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file (cache_capacity, preview_rows, pdf_min_columns)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// User the activity events are attributed to
    #[arg(long, global = true)]
    user: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the column classification and a preview of the rows.
    Load {
        file: PathBuf,
        /// Preview rows (default from config)
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Resolve a chart specification and print it as JSON.
    Chart {
        file: PathBuf,
        /// bar | line | pie | 3d-scatter | area (or "Bar Chart", ...)
        #[arg(long)]
        kind: String,
        #[arg(long)]
        x: Option<String>,
        #[arg(long)]
        y: Option<String>,
        #[arg(long)]
        z: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Print advice for a financial priority.
    Recommend {
        file: PathBuf,
        /// Savings | Investments | Expenses
        #[arg(long, default_value = "Savings")]
        priority: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config).context("building pipeline")?;
    let ctx = SessionContext { user: cli.user };

    let output = match cli.command {
        Command::Load { file, rows } => {
            let dataset = load(&pipeline, &file)?;
            let rows = rows.unwrap_or(pipeline.config().preview_rows);
            json!({
                "document": file.display().to_string(),
                "rows": dataset.len(),
                "all_columns": dataset.all_columns(),
                "numeric_columns": dataset.numeric_columns(),
                "preview": dataset.preview(rows),
            })
        }

        Command::Chart {
            file,
            kind,
            x,
            y,
            z,
            category,
        } => {
            let dataset = load(&pipeline, &file)?;
            let mut request = ChartRequest::named(&kind)?;
            request.x_field = x;
            request.y_field = y;
            request.z_field = z;
            request.category_field = category;

            let spec = pipeline.create_chart(&ctx, &dataset, &request)?;
            let legend = spec
                .color_map(&dataset)
                .map(|map| map.legend_entries())
                .unwrap_or_default();
            let palette = spec.color_scheme.colors(legend.len().max(1));
            json!({
                "spec": spec,
                "palette": palette,
                "legend": legend,
            })
        }

        Command::Recommend { file, priority } => {
            let dataset = load(&pipeline, &file)?;
            let priority: PriorityCategory = priority.parse()?;
            json!(pipeline.recommendations(&ctx, &dataset, priority))
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load(pipeline: &Pipeline, path: &Path) -> Result<Dataset> {
    let document =
        Document::from_path(path).with_context(|| format!("reading {}", path.display()))?;
    let dataset = pipeline
        .load(&document)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(dataset)
}
