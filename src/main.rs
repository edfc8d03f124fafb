mod commands;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cfdstudy_core::config;
use commands::Source;

#[derive(Parser)]
#[command(
    name = "cfdstudy-msg",
    version,
    about = "CFDSTUDY message catalog tooling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "cfdstudy-msg.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint catalogs for duplicate keys, placeholder gaps, and empty translations.
    Check {
        /// Catalog files. Defaults to every configured locale.
        files: Vec<PathBuf>,
        /// Exit with an error when any warning is found.
        #[arg(long)]
        strict: bool,
        /// Print findings as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the text for a context and key, with placeholder arguments.
    Lookup {
        context: String,
        key: String,
        /// Values for %1, %2, ...
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
        /// Locale from the config file.
        #[arg(short, long)]
        locale: Option<String>,
        /// Catalog file, overriding --locale.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Write a catalog back out as TS or JSON.
    Dump {
        /// Catalog file. Defaults to the default locale.
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Compare a translated catalog with a reference catalog.
    Diff {
        reference: PathBuf,
        translated: PathBuf,
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The configured level is not known yet; config loading logs at "info".
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(log_filter("info"))
        .with_writer(std::io::stderr)
        .finish();
    let cfg = tracing::subscriber::with_default(bootstrap, || {
        config::load(&cli.config)
            .inspect_err(|e| tracing::error!("failed to load config {}: {e}", cli.config))
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cfg.logging.level))
        .with_writer(std::io::stderr)
        .init();

    let base = Path::new(&cli.config)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    match cli.command {
        Commands::Check {
            files,
            strict,
            json,
        } => {
            let mut catalogs = Vec::new();
            if files.is_empty() {
                if cfg.catalog.locales.is_empty() {
                    catalogs.push(("bundled:en".to_string(), commands::open(Source::Default, &cfg, &base)?));
                }
                for locale in cfg.catalog.locales.keys() {
                    catalogs.push((locale.clone(), commands::open(Source::Locale(locale), &cfg, &base)?));
                }
            } else {
                for file in &files {
                    catalogs.push((file.display().to_string(), commands::open(Source::File(file), &cfg, &base)?));
                }
            }
            let outcome = commands::check(&catalogs, json)?;
            print!("{}", outcome.text);
            if strict && outcome.warnings > 0 {
                anyhow::bail!("{} warning(s) found", outcome.warnings);
            }
        }
        Commands::Lookup {
            context,
            key,
            args,
            locale,
            file,
        } => {
            let primary = match (&file, &locale) {
                (Some(path), _) => commands::open(Source::File(path), &cfg, &base)?,
                (None, Some(locale)) => commands::open(Source::Locale(locale), &cfg, &base)?,
                (None, None) => commands::open(Source::Default, &cfg, &base)?,
            };
            let fallback = if file.is_some() || locale.is_some() {
                Some(Arc::new(commands::open(Source::Default, &cfg, &base)?))
            } else {
                None
            };
            let text = commands::lookup(
                Arc::new(primary),
                fallback,
                &context,
                &key,
                &args,
                cfg.catalog.missing_arguments,
            )?;
            println!("{text}");
        }
        Commands::Dump { file, json } => {
            let catalog = match &file {
                Some(path) => commands::open(Source::File(path), &cfg, &base)?,
                None => commands::open(Source::Default, &cfg, &base)?,
            };
            print!("{}", commands::dump(&catalog, json)?);
        }
        Commands::Diff {
            reference,
            translated,
            strict,
            json,
        } => {
            let reference = commands::open(Source::File(&reference), &cfg, &base)?;
            let translated = commands::open(Source::File(&translated), &cfg, &base)?;
            let outcome = commands::diff(&reference, &translated, json)?;
            print!("{}", outcome.text);
            if strict && outcome.warnings > 0 {
                anyhow::bail!("{} warning(s) found", outcome.warnings);
            }
        }
    }

    Ok(())
}

/// `RUST_LOG` when set, else `default`.
fn log_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}
