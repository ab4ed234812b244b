use std::path::PathBuf;

use clap::{Parser, Subcommand};
use spmig::commands::{SettingsFlags, TaskSource};
use spmig::config::Config;
use spmig::logging::{self, LogTarget};
use spmig::output::Format;
use spmig::preview::Theme;
use spmig::settings::Variant;

#[derive(Parser)]
#[command(
    name = "spmig",
    version,
    about = "Build, preview, import and export SharePoint migration task JSON"
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    /// Config file (default: ./spmig.yaml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit tasks and settings interactively
    Edit {
        /// Document to load on start
        #[arg(long, value_name = "FILE")]
        import: Option<PathBuf>,
        /// Settings variant
        #[arg(long, value_enum)]
        variant: Option<Variant>,
        /// Preview theme
        #[arg(long, value_enum)]
        theme: Option<Theme>,
        /// Default export path
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Validate tasks and write the export document
    Export {
        #[command(flatten)]
        source: TaskSource,
        #[command(flatten)]
        settings: SettingsFlags,
        /// Settings variant
        #[arg(long, value_enum)]
        variant: Option<Variant>,
        /// Destination file (`-` for stdout)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Show the document an export would produce, highlighted
    Preview {
        #[command(flatten)]
        source: TaskSource,
        #[command(flatten)]
        settings: SettingsFlags,
        /// Settings variant
        #[arg(long, value_enum)]
        variant: Option<Variant>,
        /// Color theme
        #[arg(long, value_enum)]
        theme: Option<Theme>,
    },
    /// Report incomplete tasks in a document
    Validate {
        #[command(flatten)]
        source: TaskSource,
    },
    /// Print the example document
    Example {
        #[command(flatten)]
        settings: SettingsFlags,
        /// Settings variant
        #[arg(long, value_enum)]
        variant: Option<Variant>,
    },
}

fn run(cli: Cli, format: Format) -> spmig::error::Result<()> {
    let target = match cli.command {
        Commands::Edit { .. } => LogTarget::File(PathBuf::from(logging::DEBUG_LOG_FILE)),
        _ => LogTarget::Stderr,
    };
    logging::init(target)?;

    let cwd = std::env::current_dir()?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Edit {
            import,
            variant,
            theme,
            output,
        } => spmig::commands::tui::run(&config, variant, theme, import, output),
        Commands::Export {
            source,
            settings,
            variant,
            output,
        } => spmig::commands::export::run(&config, variant, &source, &settings, output, format),
        Commands::Preview {
            source,
            settings,
            variant,
            theme,
        } => spmig::commands::preview::run(&config, variant, &source, &settings, theme),
        Commands::Validate { source } => spmig::commands::validate::run(&config, &source, format),
        Commands::Example { settings, variant } => {
            spmig::commands::example::run(&config, variant, &settings, format)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    if let Err(e) = run(cli, format) {
        tracing::error!(code = e.code(), "{e}");
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
