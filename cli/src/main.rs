//! pdfnotes CLI - turn PDF highlights into study notes

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfnotes::{
    render, Category, Document, ExtractOptions, ExtractionStats, Highlight, HighlightExtractor,
    JsonFormat, LoadOptions, PageSelection, PdfParser, RenderOptions,
};

#[derive(Parser)]
#[command(name = "pdfnotes")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Extract PDF highlights, categorize them, and write study notes", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract highlights and write notes
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown", env = "PDFNOTES_FORMAT")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Show the typography profile of a document
    Profile {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show page, highlight and category counts
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Extract notes from many PDFs into a directory
    Batch {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown", env = "PDFNOTES_FORMAT")]
        format: OutputFormat,

        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by every command that extracts highlights.
#[derive(Args, Clone)]
struct ExtractArgs {
    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Use the text-only rule set
    #[arg(long, env = "PDFNOTES_LEXICAL")]
    lexical: bool,

    /// Select words per highlight quad instead of the annotation rectangle
    #[arg(long, env = "PDFNOTES_QUAD_POINTS")]
    quad_points: bool,

    /// Points trimmed from each edge of a highlight
    #[arg(long, default_value = "2.0", env = "PDFNOTES_MARGIN")]
    margin: f32,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,

    /// Fail on pages whose text cannot be decoded
    #[arg(long)]
    strict: bool,

    /// Notes title
    #[arg(long, default_value = "Study Notes", env = "PDFNOTES_TITLE")]
    title: String,

    /// Append page numbers to notes
    #[arg(long)]
    page_refs: bool,
}

impl Default for ExtractArgs {
    fn default() -> Self {
        Self {
            pages: None,
            lexical: false,
            quad_points: false,
            margin: 2.0,
            sequential: false,
            strict: false,
            title: "Study Notes".to_string(),
            page_refs: false,
        }
    }
}

impl ExtractArgs {
    fn load_options(&self) -> Result<LoadOptions, Box<dyn std::error::Error>> {
        let mut options = LoadOptions::new();
        if self.strict {
            options = options.strict();
        }
        if let Some(ref p) = self.pages {
            let selection =
                PageSelection::parse(p).map_err(pdfnotes::Error::InvalidPageRange)?;
            options = options.with_pages(selection);
        }
        Ok(options)
    }

    fn extract_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new()
            .with_margin(self.margin)
            .with_quad_points(self.quad_points)
            .with_parallel(!self.sequential);
        if self.lexical {
            options = options.lexical();
        }
        options
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_title(self.title.clone())
            .with_page_refs(self.page_refs)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown notes
    #[value(alias = "md")]
    Markdown,
    /// Plain text notes
    Text,
    /// JSON array of highlights
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }

    fn render(
        self,
        highlights: &[Highlight],
        options: &RenderOptions,
        json_format: JsonFormat,
    ) -> pdfnotes::Result<String> {
        match self {
            OutputFormat::Markdown => Ok(render::to_markdown(highlights, options)),
            OutputFormat::Text => Ok(render::to_text(highlights, options)),
            OutputFormat::Json => render::to_json(highlights, json_format),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            format,
            compact,
            args,
        }) => cmd_extract(&input, output.as_deref(), format, compact, &args),
        Some(Commands::Profile { input, json }) => cmd_profile(&input, json),
        Some(Commands::Info { input, args }) => cmd_info(&input, &args),
        Some(Commands::Batch {
            inputs,
            output,
            format,
            args,
        }) => cmd_batch(&inputs, &output, format, &args),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: Markdown notes if input is provided
            if let Some(input) = cli.input {
                cmd_extract(
                    &input,
                    cli.output.as_deref(),
                    OutputFormat::Markdown,
                    false,
                    &ExtractArgs::default(),
                )
            } else {
                println!("{}", "Usage: pdfnotes <FILE> [OUTPUT]".yellow());
                println!("       pdfnotes --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load(input: &Path, args: &ExtractArgs) -> Result<Document, Box<dyn std::error::Error>> {
    let parser = PdfParser::open_with_options(input, args.load_options()?)?;
    Ok(parser.parse()?)
}

fn extract(
    input: &Path,
    args: &ExtractArgs,
) -> Result<(Document, Vec<Highlight>, ExtractionStats), Box<dyn std::error::Error>> {
    let doc = load(input, args)?;
    let (highlights, stats) =
        HighlightExtractor::new(args.extract_options()).extract_with_stats(&doc);
    Ok((doc, highlights, stats))
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    compact: bool,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, highlights, stats) = extract(input, args)?;

    let json_format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let notes = format.render(&highlights, &args.render_options(), json_format)?;

    if let Some(path) = output {
        fs::write(path, &notes)?;
        println!(
            "{} {} ({} highlights)",
            "Saved to".green(),
            path.display(),
            stats.highlight_count()
        );
    } else {
        println!("{}", notes);
    }

    Ok(())
}

fn cmd_profile(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, &ExtractArgs::default())?;
    let profile = HighlightExtractor::default().profile(&doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("{}", "Typography Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Spans".bold(), profile.span_count());
    println!("{}: {:.1}pt", "Average size".bold(), profile.average_size());
    if let Some(body) = profile.body_size() {
        println!("{}: {:.1}pt", "Body size".bold(), body);
    }

    println!();
    println!("{}", "Heading Sizes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if profile.heading_sizes().is_empty() {
        println!("{}", "(none)".dimmed());
    }
    for (i, size) in profile.heading_sizes().iter().enumerate() {
        println!("  {} {:.1}pt", format!("H{}", i + 1).bold(), size);
    }

    println!();
    println!("{}", "Size Histogram".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (size, count) in profile.size_histogram().iter().rev() {
        println!("  {:>6.1}pt  {}", size.points(), count);
    }

    println!();
    println!("{}", "Fonts".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (name, usage) in profile.fonts() {
        let sizes: Vec<String> = usage
            .sizes
            .keys()
            .map(|s| format!("{:.1}", s.points()))
            .collect();
        println!(
            "  {}: {} spans, {} bold, sizes [{}]",
            name.as_str().bold(),
            usage.total,
            usage.bold_count,
            sizes.join(", ")
        );
    }

    Ok(())
}

fn cmd_info(input: &Path, args: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (doc, _, stats) = extract(input, args)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), doc.version);
    println!("{}: {}", "Pages".bold(), doc.page_count);
    println!("{}: {}", "Pages scanned".bold(), stats.pages_scanned);

    println!();
    println!("{}", "Highlight Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Annotations".bold(), stats.highlight_annotations);
    println!("{}: {}", "Empty".bold(), stats.empty_highlights);
    println!("{}: {}", "Notes".bold(), stats.highlight_count());

    for category in Category::ALL {
        let count = stats.count(category);
        if count > 0 {
            println!("  {:<12} {}", category.as_str(), count);
        }
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let render_options = args.render_options();
    let mut written = Vec::new();
    let mut failed = Vec::new();

    for input in inputs {
        let name = input.file_name().unwrap_or_default().to_string_lossy().to_string();
        pb.set_message(name.clone());

        // Each file is an independent session; one failure does not stop the batch.
        let result = extract(input, args).and_then(|(_, highlights, _)| {
            let notes = format.render(&highlights, &render_options, JsonFormat::Pretty)?;
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let path = output_dir.join(format!("{}.{}", stem, format.extension()));
            fs::write(&path, notes)?;
            Ok((path, highlights.len()))
        });

        match result {
            Ok(done) => written.push(done),
            Err(e) => {
                log::warn!("{}: {}", input.display(), e);
                failed.push((name, e.to_string()));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, (path, count)) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {} ({} highlights)", branch.dimmed(), path.display(), count);
    }

    if !failed.is_empty() {
        println!("\n{}", "Failed:".red().bold());
        for (name, error) in &failed {
            println!("  {} {}: {}", "✗".red(), name, error);
        }
        return Err(format!("{} of {} files failed", failed.len(), inputs.len()).into());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfnotes".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Categorized study notes from PDF highlights");
    println!();
    println!("License: MIT");
}
