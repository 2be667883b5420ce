use crate::core::DecisionRecord;
use chrono::Utc;
use colored::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_record(&mut self, record: &DecisionRecord) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_record(&mut self, record: &DecisionRecord) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_record(&mut self, record: &DecisionRecord) -> anyhow::Result<()> {
        writeln!(self.writer, "# Dermamap Decision Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;

        match record {
            DecisionRecord::Success {
                final_score,
                risk_tier,
                bucket,
                confidence,
                top_label,
                risk_message,
                recommendation,
                contributing_factors,
                followup,
                details,
                reasoning,
                disclaimer,
                ..
            } => {
                writeln!(self.writer, "## Decision")?;
                writeln!(self.writer)?;
                writeln!(self.writer, "| Field | Value |")?;
                writeln!(self.writer, "|-------|-------|")?;
                writeln!(self.writer, "| Risk tier | {} |", risk_tier)?;
                writeln!(self.writer, "| Final score | {:.3} |", final_score)?;
                writeln!(self.writer, "| Condition bucket | {} |", bucket)?;
                writeln!(self.writer, "| Confidence | {:.2} |", confidence)?;
                writeln!(self.writer, "| Top label | {} |", top_label)?;
                writeln!(self.writer, "| Images | {} |", details.image_count)?;
                writeln!(
                    self.writer,
                    "| Context adjustment | {:+.3} |",
                    details.context_adjustment
                )?;
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", risk_message)?;
                writeln!(self.writer)?;
                writeln!(self.writer, "**Recommendation:** {}", recommendation)?;
                writeln!(self.writer)?;

                if !contributing_factors.is_empty() {
                    writeln!(self.writer, "## Contributing Factors")?;
                    writeln!(self.writer)?;
                    for factor in contributing_factors {
                        writeln!(self.writer, "- {}", factor)?;
                    }
                    writeln!(self.writer)?;
                }

                if followup.requires_followup {
                    writeln!(self.writer, "## Follow-up Questions")?;
                    writeln!(self.writer)?;
                    for item in &followup.items {
                        writeln!(self.writer, "- {}", item.question)?;
                    }
                    writeln!(self.writer)?;
                }

                writeln!(self.writer, "_{}_", reasoning)?;
                writeln!(self.writer)?;
                writeln!(self.writer, "_{}_", disclaimer)?;
            }
            DecisionRecord::InconsistentAnalysis {
                message,
                followup,
                details,
                reasoning,
                disclaimer,
                ..
            } => {
                writeln!(self.writer, "## Inconsistent Analysis")?;
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", message)?;
                writeln!(self.writer)?;
                writeln!(
                    self.writer,
                    "Score spread {:.3} across {} images exceeded the consistency gate.",
                    details.score_spread, details.image_count
                )?;
                writeln!(self.writer)?;
                for question in &followup.questions {
                    writeln!(self.writer, "- {}", question)?;
                }
                writeln!(self.writer)?;
                writeln!(self.writer, "_{}_", reasoning)?;
                writeln!(self.writer)?;
                writeln!(self.writer, "_{}_", disclaimer)?;
            }
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn tier_label(tier: &crate::core::RiskTier) -> ColoredString {
        match tier {
            crate::core::RiskTier::High => "HIGH".red().bold(),
            crate::core::RiskTier::Medium => "MEDIUM".yellow().bold(),
            crate::core::RiskTier::Low => "LOW".green().bold(),
        }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_record(&mut self, record: &DecisionRecord) -> anyhow::Result<()> {
        match record {
            DecisionRecord::Success {
                final_score,
                risk_tier,
                bucket,
                confidence,
                top_label,
                risk_message,
                recommendation,
                contributing_factors,
                followup,
                details,
                disclaimer,
                ..
            } => {
                writeln!(
                    self.writer,
                    "{} risk {} (score {:.3}, confidence {:.2})",
                    Self::tier_label(risk_tier),
                    bucket.as_str().cyan(),
                    final_score,
                    confidence
                )?;
                writeln!(
                    self.writer,
                    "label: {} across {} image(s), adjustment {:+.3}",
                    top_label, details.image_count, details.context_adjustment
                )?;
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", risk_message)?;
                writeln!(self.writer, "{}", recommendation)?;

                if !contributing_factors.is_empty() {
                    writeln!(self.writer)?;
                    writeln!(self.writer, "{}", "Contributing factors:".bold())?;
                    for factor in contributing_factors {
                        writeln!(self.writer, "  - {}", factor)?;
                    }
                }

                if followup.requires_followup {
                    writeln!(self.writer)?;
                    writeln!(self.writer, "{}", "Follow-up questions:".bold())?;
                    for (i, item) in followup.items.iter().enumerate() {
                        writeln!(self.writer, "  {}. {}", i + 1, item.question)?;
                    }
                }

                writeln!(self.writer)?;
                writeln!(self.writer, "{}", disclaimer.dimmed())?;
            }
            DecisionRecord::InconsistentAnalysis {
                message,
                followup,
                details,
                disclaimer,
                ..
            } => {
                writeln!(
                    self.writer,
                    "{} {}",
                    "INCONSISTENT".red().bold(),
                    message
                )?;
                writeln!(
                    self.writer,
                    "spread {:.3} across {} image(s)",
                    details.score_spread, details.image_count
                )?;
                for question in &followup.questions {
                    writeln!(self.writer, "  - {}", question)?;
                }
                writeln!(self.writer)?;
                writeln!(self.writer, "{}", disclaimer.dimmed())?;
            }
        }
        Ok(())
    }
}

/// Build a writer for the requested format, to a file or stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}
