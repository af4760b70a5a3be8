//! CLI tool for compiling annotated Markdown into a slide model.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use slidemark_core::{
    compile, CompileOptions, Document, FsImageLocator, LayoutCatalog, OutlineFormatter, SlideDeck,
    StaticCatalog,
};
use slidemark_pptx::TemplateCatalog;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Compile a Markdown document into a template-driven slide model.
#[derive(Parser, Debug)]
#[command(name = "slidemark")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Markdown file
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Presentation template (.pptx) providing layouts and placeholders
    /// (default: the standard Office layouts)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Spaces per indentation level when the document does not set one
    #[arg(short, long, default_value = "2")]
    indent: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON slide model
    Json,
    /// Indented plain-text outline
    Outline,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let catalog = load_catalog(args.template.as_deref())?;
    let deck = process_file(&args.input, &args, catalog.as_ref())?;

    if args.verbose {
        eprintln!(
            "  Compiled {} slides{}",
            deck.slides.len(),
            if deck.toc.is_some() { " plus table of contents" } else { "" }
        );
    }

    let output = render(&deck, args.format)?;
    match &args.output {
        Some(path) => {
            write_output(path, &output)?;
            if args.verbose {
                eprintln!("Written to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load the layout catalog from a template, or fall back to the built-in one.
fn load_catalog(template: Option<&Path>) -> Result<Box<dyn LayoutCatalog>> {
    match template {
        Some(path) => {
            log::debug!("Loading template {}", path.display());
            let catalog = TemplateCatalog::from_path(path)
                .with_context(|| format!("Failed to load template {}", path.display()))?;
            Ok(Box::new(catalog))
        }
        None => {
            log::debug!("No template given, using the standard Office layouts");
            Ok(Box::new(StaticCatalog::office_default()))
        }
    }
}

/// Compile a single Markdown file.
fn process_file(input_path: &Path, args: &Args, catalog: &dyn LayoutCatalog) -> Result<SlideDeck> {
    if args.verbose {
        eprintln!("Processing: {}", input_path.display());
    }

    let document = Document::from_path(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let locator = FsImageLocator::for_document(&document.base_dir);
    let options = CompileOptions::new().with_default_indent(args.indent);

    let deck = compile(&document, catalog, &locator, &options)
        .with_context(|| format!("Failed to compile {}", input_path.display()))?;
    Ok(deck)
}

fn render(deck: &SlideDeck, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(deck).context("Failed to serialize slide model")?;
            Ok(format!("{}\n", json))
        }
        OutputFormat::Outline => Ok(OutlineFormatter::new().format_with_newline(deck)),
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
