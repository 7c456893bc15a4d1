//! tablewright command line.
//!
//! Works offline on schema files and store describe output.
//!
//! # Quick Start
//!
//! ```bash
//! # Derive the table schema of a type description
//! tablewright derive users.toml --format text
//!
//! # Plan the changes converging a live table onto it
//! aws dynamodb describe-table --table-name Users > live.json
//! tablewright plan users.toml --live live.json
//!
//! # Inspect a continuation token
//! tablewright cursor decode <token>
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tablewright::StreamViewType;

/// tablewright - declarative table schemas for key-value stores.
#[derive(Parser)]
#[command(name = "tablewright")]
#[command(
    author,
    version,
    about = "tablewright - declarative table schemas for key-value stores.",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Derive the table schema of a type description.
    Derive {
        /// Type description file (.toml or .json).
        file: PathBuf,

        #[command(flatten)]
        schema: SchemaArgs,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Plan the changes converging a table onto its type description.
    Plan {
        /// Type description file (.toml or .json).
        file: PathBuf,

        /// Describe-table output of the live table. Without it the table is
        /// treated as absent.
        #[arg(short, long)]
        live: Option<PathBuf>,

        #[command(flatten)]
        schema: SchemaArgs,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Encode or decode continuation tokens.
    #[command(subcommand)]
    Cursor(CursorCommands),

    /// Rewrite `{field}` references of a query into placeholders.
    Rewrite {
        /// Key condition expression.
        key_condition: String,

        /// Filter expression sharing the key condition's placeholders.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum CursorCommands {
    /// Encode key attributes (store JSON, e.g. '{"Id":{"S":"u1"}}') into a token.
    Encode {
        /// Key attributes as JSON.
        key: String,
    },

    /// Decode a token into its key attributes.
    Decode {
        /// Continuation token.
        token: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate the configuration files.
    Validate {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },
}

/// Overrides applied on top of the loaded configuration.
#[derive(Args, Debug)]
struct SchemaArgs {
    /// Project directory holding tablewright.toml.
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Table name (defaults to the type name).
    #[arg(long)]
    table_name: Option<String>,

    /// Table read capacity.
    #[arg(long)]
    read: Option<u64>,

    /// Table write capacity.
    #[arg(long)]
    write: Option<u64>,

    /// Enable a change stream with this view type.
    #[arg(long, value_enum)]
    stream: Option<StreamView>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Toml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StreamView {
    KeysOnly,
    NewImage,
    OldImage,
    NewAndOldImages,
}

impl From<StreamView> for StreamViewType {
    fn from(view: StreamView) -> Self {
        match view {
            StreamView::KeysOnly => Self::KeysOnly,
            StreamView::NewImage => Self::NewImage,
            StreamView::OldImage => Self::OldImage,
            StreamView::NewAndOldImages => Self::NewAndOldImages,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays machine readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Derive {
            file,
            schema,
            format,
        } => commands::derive::run(&file, &schema, format),
        Commands::Plan {
            file,
            live,
            schema,
            format,
        } => commands::plan::run(&file, live.as_deref(), &schema, format),
        Commands::Cursor(cmd) => match cmd {
            CursorCommands::Encode { key } => commands::cursor::encode(&key),
            CursorCommands::Decode { token } => commands::cursor::decode(&token),
        },
        Commands::Rewrite {
            key_condition,
            filter,
        } => commands::rewrite::run(&key_condition, filter.as_deref()),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { project, format } => commands::config::show(&project, format),
            ConfigCommands::Validate { project } => commands::config::validate(&project),
        },
    }
}
