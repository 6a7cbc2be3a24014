// src/main.rs

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use mediscan::config::CONFIG;
use mediscan::llm::{normalize, Analyzer, CompletionClient, CompletionRequest, CompletionResult, RequestKind};

#[derive(Parser)]
#[command(name = "mediscan", version, about = "AI health analysis from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze free text (default, symptom, vitals, recommendation)
    Analyze {
        #[arg(long, value_parser = parse_kind)]
        kind: RequestKind,
        #[arg(long)]
        text: String,
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Re-parse a JSON-encoded analysis field
        #[arg(long)]
        unwrap_nested: bool,
    },
    /// Analyze an image (skin, eye, medical_report)
    Scan {
        #[arg(long, value_parser = parse_kind)]
        kind: RequestKind,
        #[arg(long)]
        image_url: String,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        max_tokens: Option<u32>,
        #[arg(long)]
        unwrap_nested: bool,
    },
    /// Normalize a saved provider response without calling the model
    Normalize {
        #[arg(long, value_parser = parse_kind)]
        kind: RequestKind,
        #[arg(long)]
        envelope: PathBuf,
        #[arg(long)]
        unwrap_nested: bool,
    },
}

fn parse_kind(s: &str) -> Result<RequestKind, String> {
    RequestKind::from_str(s).ok_or_else(|| {
        let known: Vec<&str> = RequestKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("unknown kind '{}', expected one of: {}", s, known.join(", "))
    })
}

fn load_envelope(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a JSON document", path.display()))
}

fn apply_unwrap(mut result: CompletionResult, unwrap_nested: bool) -> CompletionResult {
    if unwrap_nested {
        if let CompletionResult::Analysis(analysis) = &mut result {
            analysis.unwrap_nested_analysis();
        }
    }
    result
}

async fn run_remote(request: CompletionRequest) -> Result<CompletionResult> {
    let client = CompletionClient::from_env()?;
    let analyzer = Analyzer::new(client);
    Ok(analyzer.analyze_or_fallback(&request).await)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(CONFIG.tracing_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze { kind, text, max_tokens, unwrap_nested } => {
            if kind.is_image() {
                bail!("'{}' needs an image, use `mediscan scan`", kind);
            }
            let request = CompletionRequest::from_parts(kind, text, max_tokens, None)?;
            apply_unwrap(run_remote(request).await?, unwrap_nested)
        }
        Command::Scan { kind, image_url, context, max_tokens, unwrap_nested } => {
            if !kind.is_image() {
                bail!("'{}' is a text analysis, use `mediscan analyze`", kind);
            }
            let request = CompletionRequest::from_parts(kind, image_url, max_tokens, context)?;
            apply_unwrap(run_remote(request).await?, unwrap_nested)
        }
        Command::Normalize { kind, envelope, unwrap_nested } => {
            let envelope = load_envelope(&envelope)?;
            info!("Normalizing saved {} response", kind);
            apply_unwrap(normalize(kind, &envelope), unwrap_nested)
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_kind_lists_known_kinds() {
        assert_eq!(parse_kind("vitals"), Ok(RequestKind::Vitals));
        let err = parse_kind("xray").unwrap_err();
        assert!(err.contains("medical_report"));
    }

    #[test]
    fn test_load_envelope_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"choices":[{{"message":{{"content":"{{\"analysis\":\"ok\"}}"}}}}]}}"#).unwrap();

        let envelope = load_envelope(file.path()).unwrap();
        let result = apply_unwrap(normalize(RequestKind::Default, &envelope), true);
        assert_eq!(result.as_analysis().unwrap().analysis, "ok");
    }

    #[test]
    fn test_load_envelope_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html>502 Bad Gateway</html>").unwrap();
        assert!(load_envelope(file.path()).is_err());
    }

    #[test]
    fn test_cli_parses_scan() {
        let cli = Cli::try_parse_from([
            "mediscan", "scan", "--kind", "skin", "--image-url", "https://cdn.example.com/a.jpg", "--context", "itchy",
        ])
        .unwrap();
        match cli.command {
            Command::Scan { kind, context, .. } => {
                assert_eq!(kind, RequestKind::Skin);
                assert_eq!(context.as_deref(), Some("itchy"));
            }
            _ => panic!("expected scan command"),
        }
    }
}
