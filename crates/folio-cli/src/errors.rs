use console::style;
use folio_core::config::BackendKind;
use folio_core::models::Section;
use folio_core::FolioError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn section_names() -> String {
    Section::lists().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}

/// Create error for a section name that does not exist or is not a list
pub fn unknown_section(name: &str) -> CliError {
    CliError::new(format!("Unknown section: {}", name))
        .with_context(format!("Record commands work on list sections.\n\nSections: {}", section_names()))
        .with_suggestion("Use one of the section names above")
        .with_suggestion("Edit the about record with: folio about key=value")
        .with_help("Run: folio list --help")
}

/// Create error for an id that is not in the section
pub fn record_not_found(section: Section, id: &str) -> CliError {
    CliError::new(format!("No {} record with id '{}'", section, id))
        .with_suggestion(format!("List existing ids: folio list {}", section))
}

/// Create error for an id that is not in an inbox
pub fn inbox_entry_not_found(kind: &str, id: &str) -> CliError {
    CliError::new(format!("No {} with id '{}'", kind, id))
        .with_suggestion(format!("List existing ids: folio {}s list", kind))
}

/// Create error for a backend that could not be reached
pub fn storage_unavailable(backend: BackendKind, error: &str) -> CliError {
    let error = CliError::new(format!("Cannot reach {} storage", backend))
        .with_context(format!("The storage backend failed.\n\nError: {}", error));

    let error = match backend {
        BackendKind::Postgres => error
            .with_suggestion("Ensure PostgreSQL is running and DATABASE_URL is correct")
            .with_suggestion("Or set database_url in folio.toml"),
        BackendKind::Remote => error
            .with_suggestion("Check FOLIO_REMOTE_URL and FOLIO_REMOTE_AUTH")
            .with_suggestion("Or set remote_url and remote_auth in folio.toml"),
        BackendKind::File => error
            .with_suggestion("Check that the data directory is readable and writable")
            .with_suggestion("Or point at another one: --data-dir <DIR>"),
        BackendKind::Memory => error,
    };

    error
        .with_suggestion("Or use a local backend: --backend file")
        .with_help("Run: folio init --interactive")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check folio.toml for syntax errors")
        .with_suggestion("Or regenerate it: folio init --force")
        .with_help("Run: folio init --help")
}

/// Create error for an input file that does not exist
pub fn file_not_found(path: &str) -> CliError {
    CliError::new("File not found")
        .with_context(format!("The specified file does not exist.\n\nPath: {}", path))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
}

/// Map a store error to a CLI error
pub fn from_folio(error: &FolioError, backend: BackendKind) -> CliError {
    match error {
        FolioError::UnknownSection { name } => unknown_section(name),
        FolioError::NotAList { section } => unknown_section(section.as_str()),
        FolioError::ConfigMissing { key } => invalid_config(key, "required by the selected backend but not set"),
        FolioError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        FolioError::Backend { reason, .. } => storage_unavailable(backend, reason),
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };

    let message = format!("{:#}", error);

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}
