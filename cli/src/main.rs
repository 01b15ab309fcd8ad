use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Once};

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "ahk_core=info,ahk_lsp=info,ahk_cli=info";

use ahk_core::{
    analysis::{analyze_with, format_diagnostics},
    lint::Linter,
    stmt::parse,
    token::Tokenizer,
};
use ahk_lsp::{encode_semantic_tokens, lsp_types::Position, AhkAnalyzer, DocIndex, StandardsEngine};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

mod config;

use config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "ahk", author, version, about = "Analyze AutoHotkey v2 scripts", long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with `[lint]` and `[diagnostics]` tables
    #[arg(long, global = true, value_name = "FILE", value_parser = parse_sanitized_path)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the token stream.
    Tokenize {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
    },
    /// Print the syntax tree and any statements recovery dropped.
    Parse {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
    },
    /// Run the linter.
    Lint {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
    },
    /// Run the line-level diagnostics provider and coding-standards rules.
    Diagnose {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
        /// Keep only one level: error, warning, info, hint or all
        #[arg(long, value_name = "LEVEL")]
        severity: Option<String>,
        /// Skip the coding-standards rules
        #[arg(long)]
        no_standards: bool,
    },
    /// Classify tokens for highlighting.
    Semantic {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
        /// Emit the LSP relative encoding instead of absolute positions
        #[arg(long)]
        encoded: bool,
    },
    /// Completion candidates at a 0-based line and character.
    Complete {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
        #[arg(long)]
        line: u32,
        #[arg(long)]
        character: u32,
        /// Documentation index (JSON); the bundled index is used otherwise
        #[arg(long, value_name = "INDEX", value_parser = parse_sanitized_path)]
        docs: Option<PathBuf>,
    },
    /// Code statistics.
    Stats {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
    },
    /// Exit with status 1 when the linter reports errors.
    Check {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
    },
}

impl Commands {
    fn file(&self) -> &Path {
        match self {
            Commands::Tokenize { file }
            | Commands::Parse { file }
            | Commands::Lint { file }
            | Commands::Diagnose { file, .. }
            | Commands::Semantic { file, .. }
            | Commands::Complete { file, .. }
            | Commands::Stats { file }
            | Commands::Check { file } => file,
        }
    }
}

/// Rendered command output and whether the process should exit successfully.
#[derive(Debug)]
struct Outcome {
    output: String,
    success: bool,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Self { output, success: true }
    }
}

fn read_file_content(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path.display()))
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);

    for comp in p.components() {
        if matches!(comp, Component::ParentDir) {
            return Err(anyhow::anyhow!(
                "Parent directory components ('..') are not allowed in file paths."
            ));
        }
    }

    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let raw = match std::env::var("AHK_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("serializing output")?;
    out.push('\n');
    Ok(out)
}

/// Run one command against already-read source text.
fn run_command(args: &CliArgs, config: &CliConfig, source: &str) -> anyhow::Result<Outcome> {
    let json = args.format == OutputFormat::Json;
    let linter = Linter::with_config(config.lint.clone());

    let outcome = match &args.command {
        Commands::Tokenize { .. } => {
            let tokens = Tokenizer::tokenize(source).context("tokenizing")?;
            if json {
                Outcome::ok(to_json(&tokens)?)
            } else {
                let mut out = String::new();
                for t in &tokens {
                    let _ = writeln!(out, "{}:{} {} {:?}", t.line, t.column, t.kind, t.text);
                }
                Outcome::ok(out)
            }
        }
        Commands::Parse { .. } => {
            let parsed = parse(source).context("parsing")?;
            if json {
                Outcome::ok(to_json(&parsed)?)
            } else {
                let mut out = format!("{:#?}\n", parsed.program);
                for skipped in &parsed.skipped {
                    let _ = writeln!(out, "skipped {}: {}", skipped.span.start, skipped.message);
                }
                Outcome::ok(out)
            }
        }
        Commands::Lint { .. } => {
            let diagnostics = linter.lint(source);
            Outcome::ok(if json {
                to_json(&diagnostics)?
            } else {
                format_diagnostics(&diagnostics)
            })
        }
        Commands::Diagnose {
            severity, no_standards, ..
        } => {
            let mut options = config.diagnostics.clone();
            if severity.is_some() {
                options.severity_filter = severity.clone();
            }
            if *no_standards {
                options.enable_standards = false;
            }
            let diagnostics = AhkAnalyzer::default().diagnose(source, &options);
            Outcome::ok(if json {
                to_json(&diagnostics)?
            } else {
                format_diagnostics(&diagnostics)
            })
        }
        Commands::Semantic { encoded, .. } => {
            let tokens = AhkAnalyzer::default().semantic_tokens(source);
            match (*encoded, json) {
                (true, true) => Outcome::ok(to_json(&ahk_lsp::lsp_types::SemanticTokens { result_id: None, data: encode_semantic_tokens(&tokens) })?),
                (true, false) => {
                    let mut out = String::new();
                    for t in encode_semantic_tokens(&tokens) {
                        let _ = writeln!(
                            out,
                            "{} {} {} {} {}",
                            t.delta_line, t.delta_start, t.length, t.token_type, t.token_modifiers_bitset
                        );
                    }
                    Outcome::ok(out)
                }
                (false, true) => Outcome::ok(to_json(&tokens)?),
                (false, false) => {
                    let mut out = String::new();
                    for t in &tokens {
                        let modifiers: Vec<&str> = t.modifiers.iter().map(|m| m.as_str()).collect();
                        let _ = writeln!(
                            out,
                            "{}:{} {} {} [{}]",
                            t.line,
                            t.character,
                            t.length,
                            t.token_type.as_str(),
                            modifiers.join(",")
                        );
                    }
                    Outcome::ok(out)
                }
            }
        }
        Commands::Complete {
            line, character, docs, ..
        } => {
            let index = match docs {
                Some(path) => DocIndex::from_path(path)?,
                None => DocIndex::builtin().clone(),
            };
            let analyzer = AhkAnalyzer::new(Arc::new(index), Arc::new(StandardsEngine::new()));
            let items = analyzer.completions(source, Position::new(*line, *character));
            if json {
                Outcome::ok(to_json(&items)?)
            } else {
                let mut out = String::new();
                for item in &items {
                    let _ = writeln!(out, "{}\t{}", item.label, item.detail.as_deref().unwrap_or(""));
                }
                Outcome::ok(out)
            }
        }
        Commands::Stats { .. } => {
            let report = analyze_with(&linter, source).context("analyzing")?;
            let stats = &report.statistics;
            if json {
                Outcome::ok(to_json(stats)?)
            } else {
                Outcome::ok(format!(
                    "lines: {}\ntokens: {}\nfunctions: {}\nclasses: {}\ncomments: {}\ncomplexity: {}\n",
                    stats.lines, stats.tokens, stats.functions, stats.classes, stats.comments, stats.complexity
                ))
            }
        }
        Commands::Check { .. } => {
            let errors: Vec<_> = linter.lint(source).into_iter().filter(|d| d.is_error()).collect();
            let valid = errors.is_empty();
            let output = if json {
                to_json(&serde_json::json!({ "valid": valid, "errors": errors }))?
            } else if valid {
                "ok\n".to_string()
            } else {
                format_diagnostics(&errors)
            };
            Outcome { output, success: valid }
        }
    };
    Ok(outcome)
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();
    let args = CliArgs::parse();
    let config = CliConfig::load(args.config.as_deref())?;
    let path = args.command.file();
    let source = read_file_content(path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "read source");

    let outcome = run_command(&args, &config, &source).with_context(|| format!("while processing {}", path.display()))?;
    print!("{}", outcome.output);
    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
