//! Command-line front end: source generation and translation inspection.
//!
//! No compiler backend is bundled; `generate` stops at the synthesized source.

use std::io::{
    self,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use nlocalizer::codegen::{
    CodeTemplates,
    TemplateError,
};
use nlocalizer::config::{
    ConfigError,
    ConfigManager,
    LocalizerSettings,
};
use nlocalizer::host::{
    AcceptAllTypes,
    ManifestError,
    TypeManifest,
    TypeResolver,
};
use nlocalizer::input;
use nlocalizer::{
    Localizer,
    LocalizerError,
    TranslationStore,
};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(name = "nlocalizer")]
#[command(version)]
#[command(about = "Reads .lang translation files and generates the runtime translator source")]
struct Cli {
    /// Command to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the runtime translator source
    Generate {
        /// Translation directory
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// JSON type manifest; without it every class and member is accepted
        #[arg(short, long, value_name = "MANIFEST")]
        types: Option<PathBuf>,

        /// Write the source to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on classes and members the host does not define
        #[arg(long)]
        strict: bool,
    },

    /// Look up one property through the language fallback chain
    Lookup {
        /// Translation directory
        #[arg(value_name = "DIR")]
        directory: PathBuf,
        /// Language name or locale code
        language: String,
        /// Class holding the property
        class_name: String,
        /// Property name, possibly dotted (`button1.Text`)
        property_name: String,
    },

    /// List languages, locales and directives
    Inspect {
        /// Translation directory
        #[arg(value_name = "DIR")]
        directory: PathBuf,
    },

    /// Print the effective template set
    Templates {
        /// Template override file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Any failure of a command.
#[derive(Error, Debug)]
enum CliError {
    /// Loading, synthesis or compilation
    #[error(transparent)]
    Localizer(#[from] LocalizerError),

    /// `.nlocalizer.json`
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `--types` manifest
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// `--file` template override
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Writing the output
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Parses arguments, sets up logging and runs the command.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(log_file(&cli.command));

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            let _ = writeln!(io::stderr().lock(), "error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Log file named by a `log` directive under the command's directory.
///
/// Runs before logging is set up, so read failures are ignored here and
/// reported by the command itself.
fn log_file(command: &Commands) -> Option<PathBuf> {
    let directory = match command {
        Commands::Generate { directory, .. }
        | Commands::Lookup { directory, .. }
        | Commands::Inspect { directory } => directory,
        Commands::Templates { .. } => return None,
    };
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(directory.clone())).ok()?;
    let settings = manager.get_settings();
    let translation_directory = manager.translation_directory();

    let mut store = TranslationStore::new();
    input::read_directory(
        &translation_directory,
        &settings.lang_file_pattern,
        &settings.nested_directory,
        &mut store,
    )
    .ok()?;
    store.log_file_name.map(|name| translation_directory.join(name))
}

/// Installs the subscriber: a file writer when a log file is named, stderr otherwise.
fn init_logging(log_file: Option<PathBuf>) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
        return None;
    };

    let directory = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let file_name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    Some(guard)
}

/// Settings of `directory`'s `.nlocalizer.json`, with the translation
/// directory resolved.
fn load_settings(directory: &Path) -> Result<LocalizerSettings, CliError> {
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(directory.to_path_buf()))?;
    let mut settings = manager.get_settings().clone();
    settings.translation_directory = Some(manager.translation_directory());
    Ok(settings)
}

/// Localizer with the languages of `directory` loaded.
fn load_localizer(
    directory: &Path,
    types: Box<dyn TypeResolver>,
    strict: bool,
) -> Result<Localizer, CliError> {
    let mut settings = load_settings(directory)?;
    settings.report_errors |= strict;
    let mut localizer = Localizer::new(settings, types);
    localizer.load_languages()?;
    Ok(localizer)
}

/// Runs one command, writing results to stdout.
fn run(command: Commands) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    match command {
        Commands::Generate { directory, types, output, strict } => {
            let types: Box<dyn TypeResolver> = match types {
                Some(path) => Box::new(TypeManifest::load(&path)?),
                None => Box::new(AcceptAllTypes),
            };
            let localizer = load_localizer(&directory, types, strict)?;
            let source = localizer.generate_source()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, source)?;
                    tracing::info!("Wrote generated source to {:?}", path);
                }
                None => out.write_all(source.as_bytes())?,
            }
        }
        Commands::Lookup { directory, language, class_name, property_name } => {
            let localizer = load_localizer(&directory, Box::new(AcceptAllTypes), false)?;
            let property = localizer.store().property(&language, &class_name, &property_name);
            let marker = if property.is_static { " (static)" } else { "" };
            writeln!(out, "{}{marker}", property.message)?;
        }
        Commands::Inspect { directory } => {
            let localizer = load_localizer(&directory, Box::new(AcceptAllTypes), false)?;
            inspect(&mut out, localizer.store())?;
        }
        Commands::Templates { file } => {
            let mut templates = CodeTemplates::new();
            if let Some(path) = file {
                templates.load_file(&path)?;
            }
            out.write_all(templates.to_text().as_bytes())?;
        }
    }
    Ok(())
}

/// Summary of the loaded languages and directives.
fn inspect(out: &mut impl Write, store: &TranslationStore) -> io::Result<()> {
    writeln!(out, "Languages:")?;
    for language in store.languages() {
        let classes = store.classes(language).map_or(0, |classes| classes.len());
        let locales = store.locales_for(language).join(", ");
        writeln!(out, "  {language} [{locales}] ({classes} classes)")?;
    }
    writeln!(out, "Current language: {}", store.current_language().unwrap_or("-"))?;
    writeln!(out, "Usings: {}", store.code_usings().join(", "))?;
    writeln!(out, "Modules: {}", store.code_modules().join(", "))?;
    writeln!(out, "Static classes: {}", store.static_classes().join(", "))?;
    writeln!(out, "Macros: {}", store.macros().join(", "))?;
    writeln!(out, "Framework: {}", store.framework_version.as_deref().unwrap_or("-"))?;
    for (label, value) in [
        ("Debug file", &store.debug_file_name),
        ("Log file", &store.log_file_name),
        ("Template file", &store.template_file_name),
    ] {
        writeln!(out, "{label}: {}", value.as_deref().unwrap_or("-"))?;
    }
    Ok(())
}
