//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{EscribaArgs, OutputFormat};
use crate::error::Result;
use crate::pipeline::stage::{StageResult, StageValue};

/// Name and version, as reported by `escriba version`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
}

/// Corrections proposed for one word.
#[derive(Debug, Serialize, Deserialize)]
pub struct WordCorrection {
    pub palavra: String,
    /// Frequency corrector's choice.
    pub frequencia: String,
    /// Suggestion engine's choice, if any.
    pub biblioteca: Option<String>,
    /// Ranked suggestions with their scores.
    pub sugestoes: Vec<(String, f64)>,
}

/// Output a stage list in the selected format.
pub fn output_stages(results: &[StageResult], args: &EscribaArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(&results, args),
        OutputFormat::Human => {
            output_stages_human(results);
            Ok(())
        }
    }
}

/// Output a result in the selected format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &EscribaArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Human => output_human(message, result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &EscribaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn output_human<T: Serialize>(message: &str, result: &T, args: &EscribaArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    output_generic_human(&value, 0);
    Ok(())
}

fn output_stages_human(results: &[StageResult]) {
    for (i, result) in results.iter().enumerate() {
        println!("{}. {} ({:.2} ms)", i + 1, result.etapa, result.tempo);
        println!("{}", "─".repeat(40));
        println!("{}", describe_value(&result.saida));
        if let Some(error) = &result.erro {
            println!("! {error}");
        }
        println!();
    }

    let total: f64 = results.iter().map(|r| r.tempo).sum();
    println!("Total time: {total:.2} ms");
}

/// One-paragraph rendering of a stage value.
pub fn describe_value(value: &StageValue) -> String {
    match value {
        StageValue::Missing => "(no content)".to_string(),
        StageValue::Text(text) if text.chars().count() > 300 => {
            let head: String = text.chars().take(300).collect();
            format!("{head}… ({} characters)", text.chars().count())
        }
        StageValue::Text(text) => text.clone(),
        StageValue::Sentences(sentences) => sentences
            .iter()
            .map(|sentence| format!("- {sentence}"))
            .collect::<Vec<_>>()
            .join("\n"),
        StageValue::Words(words) => words
            .iter()
            .map(|sentence| format!("[{}]", sentence.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Generic output for JSON values.
fn output_generic_human(value: &serde_json::Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        println!("{pad}{key}:");
                        output_generic_human(val, indent + 1);
                    }
                    _ => println!("{pad}{key}: {}", format_scalar(val)),
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr {
                match item {
                    serde_json::Value::Object(_) => {
                        output_generic_human(item, indent);
                        println!();
                    }
                    _ => println!("{pad}- {}", format_scalar(item)),
                }
            }
        }
        _ => println!("{pad}{}", format_scalar(value)),
    }
}

fn format_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
