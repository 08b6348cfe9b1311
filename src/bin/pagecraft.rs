use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagecraft::publish::{embed_snippet, public_link};
use pagecraft::{
    parse_page, render_document, BrowserFrame, CategoryFilter, DesignerConfig, DesignerError,
    DesignerResult, DocumentOptions, Page, RenderMode, TemplateCatalog, TemplateFilter,
};

#[derive(Parser)]
#[command(name = "pagecraft", version, about = "Interactive page designer tools")]
struct Cli {
    /// Designer config (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate page JSON files
    Validate {
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Render a page to a standalone HTML document
    Render {
        file: String,

        #[arg(long, value_enum, default_value = "preview")]
        mode: ModeArg,

        /// Wrap the page in browser chrome showing its public link
        #[arg(long)]
        frame: bool,
    },

    /// List the built-in templates
    Templates {
        /// Category name, or "all"
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print the public link and iframe snippet for a published page
    Embed { file: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Edit,
    Preview,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Edit => RenderMode::Edit,
            ModeArg::Preview => RenderMode::Preview,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match DesignerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ {}:", path.display());
                print_error(&e);
                process::exit(1);
            }
        },
        None => DesignerConfig::default(),
    };

    let exit_code = match cli.command {
        Command::Validate { files } => cmd_validate(&files),
        Command::Render { file, mode, frame } => {
            report(cmd_render(&file, mode.into(), frame, &config))
        }
        Command::Templates { category, search } => report(cmd_templates(&category, search)),
        Command::Embed { file } => report(cmd_embed(&file, &config)),
    };
    process::exit(exit_code);
}

fn report(result: DesignerResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            print_error(&e);
            1
        }
    }
}

fn load_page(path: &str) -> DesignerResult<Page> {
    let content = fs::read_to_string(Path::new(path))
        .map_err(|e| DesignerError::ValidationError(format!("Failed to read file: {}", e)))?;
    parse_page(&content)
}

fn cmd_validate(files: &[String]) -> i32 {
    let mut exit_code = 0;
    for file_path in files {
        match load_page(file_path) {
            Ok(page) => {
                println!("✓ {} is valid ({} blocks)", file_path, page.blocks.len());
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }
    exit_code
}

fn cmd_render(
    path: &str,
    mode: RenderMode,
    frame: bool,
    config: &DesignerConfig,
) -> DesignerResult<()> {
    let page = load_page(path)?;
    let options = DocumentOptions {
        mode,
        selected: None,
        frame: frame.then(|| BrowserFrame::for_page(&config.public_host, &page)),
    };
    print!("{}", render_document(&page, &options));
    Ok(())
}

fn cmd_templates(category: &str, search: Option<String>) -> DesignerResult<()> {
    let filter = TemplateFilter {
        category: category.parse::<CategoryFilter>()?,
        search,
    };
    let catalog = TemplateCatalog::builtin();
    let templates = catalog.list_templates(&filter);
    if templates.is_empty() {
        println!("No templates match");
    }
    for template in templates {
        println!(
            "{:<20} {:<10} {} ({} blocks)",
            template.id,
            template.category.label(),
            template.name,
            template.blueprint.len()
        );
    }
    Ok(())
}

fn cmd_embed(path: &str, config: &DesignerConfig) -> DesignerResult<()> {
    let page = load_page(path)?;
    println!("{}", public_link(&config.public_host, &page)?);
    println!("{}", embed_snippet(&config.public_host, &page, config.embed_height)?);
    Ok(())
}

fn print_error(error: &DesignerError) {
    match error {
        DesignerError::ValidationError(msg) => {
            eprintln!("  Validation error:");
            eprintln!("    {}", msg);
        }
        DesignerError::InvalidContent { block_type, reason } => {
            eprintln!("  Invalid content for '{}' block:", block_type);
            eprintln!("    {}", reason);
        }
        DesignerError::InvalidColor { value, reason } => {
            eprintln!("  Invalid color value '{}':", value);
            eprintln!("    {}", reason);
        }
        DesignerError::ValueOutOfRange {
            property,
            value,
            range,
        } => {
            eprintln!("  Value out of range for '{}':", property);
            eprintln!("    Value: {}", value);
            eprintln!("    Expected range: {}", range);
        }
        DesignerError::DeserializationError(msg) => {
            eprintln!("  Deserialization error:");
            eprintln!("    {}", msg);
        }
        DesignerError::YamlError(msg) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", msg);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
