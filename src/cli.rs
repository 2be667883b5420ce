use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::ConditionBucket;
use crate::io::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "dermamap")]
#[command(about = "Skin lesion risk scoring and triage engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a request file of image observations and patient context
    Evaluate {
        /// Path to the JSON request ({images, context, followup_answers})
        request: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: FormatArg,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the multi-image disagreement threshold
        #[arg(long)]
        disagreement_threshold: Option<f64>,
    },

    /// Print the follow-up question catalog
    Catalog {
        /// Only this condition bucket
        #[arg(long, value_enum)]
        bucket: Option<BucketArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: FormatArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Human-readable terminal output
    Terminal,
    /// Pretty-printed JSON
    Json,
    /// Markdown report
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Terminal => OutputFormat::Terminal,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BucketArg {
    Oncologic,
    Fungal,
    Bacterial,
    Inflammatory,
    General,
}

impl From<BucketArg> for ConditionBucket {
    fn from(bucket: BucketArg) -> Self {
        match bucket {
            BucketArg::Oncologic => ConditionBucket::Oncologic,
            BucketArg::Fungal => ConditionBucket::Fungal,
            BucketArg::Bacterial => ConditionBucket::Bacterial,
            BucketArg::Inflammatory => ConditionBucket::Inflammatory,
            BucketArg::General => ConditionBucket::General,
        }
    }
}
