use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_core::config::BackendKind;
use std::path::PathBuf;

/// Folio - Portfolio content administration
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Manage portfolio content, applications and messages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage backend (overrides folio.toml and FOLIO_BACKEND)
    #[arg(long, global = true)]
    pub backend: Option<BackendArg>,

    /// Configuration file (defaults to ./folio.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data directory for the file backend
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// In-memory storage, discarded on exit
    Memory,
    /// JSON files in the data directory
    File,
    /// Hosted realtime database over REST
    Remote,
    /// PostgreSQL
    Postgres,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Memory => BackendKind::Memory,
            BackendArg::File => BackendKind::File,
            BackendArg::Remote => BackendKind::Remote,
            BackendArg::Postgres => BackendKind::Postgres,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter folio.toml and initialize storage
    Init(InitArgs),

    /// Show the about record and section counts
    Show,

    /// List the records of a section
    List(ListArgs),

    /// Add a record to a section
    Add(AddArgs),

    /// Update fields of a record
    Update(UpdateArgs),

    /// Remove a record from a section
    Remove(RemoveArgs),

    /// Update fields of the about record
    About(AboutArgs),

    /// Export the whole document as JSON
    Export(ExportArgs),

    /// Replace the whole document with an exported one
    Import(ImportArgs),

    /// Replace the whole document with the default one
    Reset(ConfirmArgs),

    /// Import research papers from a BibTeX file
    Bibtex(BibtexArgs),

    /// Review job and project applications
    Applications {
        #[command(subcommand)]
        action: ApplicationAction,
    },

    /// Review contact messages
    Messages {
        #[command(subcommand)]
        action: MessageAction,
    },
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write folio.toml into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing folio.toml
    #[arg(long)]
    pub force: bool,

    /// Interactive mode - prompt for all settings
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Section name (education, projects, courses, research, openings, blogs,
    /// categories, gallery, certifications)
    pub section: String,
}

/// Field input shared by add, update and about
#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Fields as key=value (string) or key:=json (raw JSON value)
    #[arg(value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Fields as a JSON object, applied before FIELD arguments
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub section: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub section: String,

    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    pub section: String,

    pub id: String,

    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

#[derive(Args, Debug)]
pub struct AboutArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File produced by `folio export`
    pub file: PathBuf,

    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

#[derive(Args, Debug)]
pub struct BibtexArgs {
    /// .bib file to import
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum ApplicationAction {
    /// List applications, newest first
    List,

    /// Move an application to a new status
    Status {
        id: String,
        /// reviewed, accepted or rejected
        status: String,
    },

    /// Delete an application
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum MessageAction {
    /// List messages, newest first
    List,

    /// Mark a message as read
    Read { id: String },

    /// Delete a message
    Delete {
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}
