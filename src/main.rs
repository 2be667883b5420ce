use anyhow::{Context as _, Result};
use clap::Parser;
use dermamap::cli::{Cli, Commands};
use dermamap::config::EngineConfig;
use dermamap::core::ConditionBucket;
use dermamap::engine::{DecisionEngine, EvaluationRequest};
use dermamap::followup;
use dermamap::io::create_writer;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            request,
            format,
            output,
            disagreement_threshold,
        } => {
            let payload = std::fs::read_to_string(&request)
                .with_context(|| format!("failed to read request file {}", request.display()))?;
            let parsed: EvaluationRequest = serde_json::from_str(&payload)
                .with_context(|| format!("invalid request JSON in {}", request.display()))?;

            let mut config = EngineConfig::default();
            if let Some(threshold) = disagreement_threshold {
                config.aggregation.disagreement_threshold = threshold;
            }

            let engine = DecisionEngine::with_config(config);
            let record = engine.evaluate_request(&parsed)?;

            let mut writer = create_writer(format.into(), output.as_deref())?;
            writer.write_record(&record)?;
        }
        Commands::Catalog { bucket, format } => {
            let buckets: Vec<ConditionBucket> = match bucket {
                Some(bucket) => vec![bucket.into()],
                None => ConditionBucket::ALL.to_vec(),
            };
            print_catalog(&buckets, format)?;
        }
    }

    Ok(())
}

fn print_catalog(buckets: &[ConditionBucket], format: dermamap::cli::FormatArg) -> Result<()> {
    match format {
        dermamap::cli::FormatArg::Json => {
            let catalog: serde_json::Map<String, serde_json::Value> = buckets
                .iter()
                .map(|bucket| {
                    let entries: Vec<serde_json::Value> = followup::catalog(*bucket)
                        .iter()
                        .map(|entry| {
                            serde_json::json!({"key": entry.key, "question": entry.question})
                        })
                        .collect();
                    (bucket.as_str().to_string(), serde_json::Value::from(entries))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        _ => {
            for bucket in buckets {
                println!("{}:", bucket.display_name());
                for entry in followup::catalog(*bucket) {
                    println!("  {} - {}", entry.key, entry.question);
                }
                println!();
            }
        }
    }
    Ok(())
}
