//! `ikcms` command line
//!
//! ```text
//! ikcms [--config app.toml] validate --schema article.yaml --input doc.json [--json] [--cached]
//! ikcms [--config app.toml] check-schema --schema article.yaml
//! ```

use crate::app::{cache_component, App, AppDefinition, ComponentFactory};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::handler::{CachedValidateHandler, Handler, ValidateHandler};
use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ikcms_forms::{Field, FieldSpec, SchemaError, SchemaResult, ValidationError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path label for a failure of the whole document
const ROOT_PATH: &str = "<root>";

/// Application built from a declarative schema file
#[derive(Debug, Clone)]
pub struct SchemaApp {
    spec: FieldSpec,
    cached: bool,
}

impl SchemaApp {
    /// Create from a parsed schema description
    #[inline]
    #[must_use]
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            cached: false,
        }
    }

    /// Answer through the cache component
    #[inline]
    #[must_use]
    pub fn cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }
}

impl AppDefinition for SchemaApp {
    fn components(&self) -> Vec<ComponentFactory> {
        vec![cache_component]
    }

    fn handler(&self) -> Box<dyn Handler> {
        if self.cached {
            Box::new(CachedValidateHandler::default())
        } else {
            Box::new(ValidateHandler)
        }
    }

    fn root(&self) -> SchemaResult<Field> {
        self.spec.build()
    }
}

/// Argument definitions
#[must_use]
pub fn command() -> Command {
    Command::new("ikcms")
        .version(crate::VERSION)
        .about("Validate documents against ikcms form schemas")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with [cache] and [logging] settings"),
        )
        .subcommand(
            Command::new("validate")
                .about("Convert a JSON document with a schema and print its canonical form")
                .arg(schema_arg())
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON document to validate"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print validation errors as a JSON tree"),
                )
                .arg(
                    Arg::new("cached")
                        .long("cached")
                        .action(ArgAction::SetTrue)
                        .help("Answer through the cache component"),
                ),
        )
        .subcommand(
            Command::new("check-schema")
                .about("Build a schema and report construction errors")
                .arg(schema_arg()),
        )
}

fn schema_arg() -> Arg {
    Arg::new("schema")
        .long("schema")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Schema description (.json, otherwise YAML)")
}

fn path_arg<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .with_context(|| format!("missing --{id}"))
}

/// Run parsed arguments, writing the report to `out`
///
/// Returns `Ok(false)` when the document or schema was rejected; `Err` for
/// anything that kept the command from running (unreadable files, bad
/// configuration).
pub fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<bool> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    match matches.subcommand() {
        Some(("validate", args)) => validate(
            config,
            path_arg(args, "schema")?,
            path_arg(args, "input")?,
            args.get_flag("json"),
            args.get_flag("cached"),
            out,
        ),
        Some(("check-schema", args)) => check_schema(path_arg(args, "schema")?, out),
        Some((other, _)) => anyhow::bail!("unknown command '{other}'"),
        None => anyhow::bail!("no command given"),
    }
}

fn validate<W: Write>(
    config: AppConfig,
    schema: &Path,
    input: &Path,
    json: bool,
    cached: bool,
    out: &mut W,
) -> Result<bool> {
    let spec = FieldSpec::load(schema)?;
    let app = App::new(config, &SchemaApp::new(spec).cached(cached))?;

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let request: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    match app.handle(&request) {
        Ok(response) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
            Ok(true)
        }
        Err(e) => match e.validation() {
            Some(errors) => {
                write_errors(errors, json, out)?;
                Ok(false)
            }
            // Wrong shape for the whole document reports as a root leaf
            None if matches!(&e, AppError::Conversion(c) if c.is_raw_type_error()) => {
                let errors = ValidationError::message(app.root().converter().error_not_valid());
                write_errors(&errors, json, out)?;
                Ok(false)
            }
            None if e.is_client_error() => {
                writeln!(out, "{e}")?;
                Ok(false)
            }
            None => Err(e.into()),
        },
    }
}

fn write_errors<W: Write>(errors: &ValidationError, json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(errors)?)?;
        return Ok(());
    }
    for (path, message) in errors.leaves() {
        let path = if path.is_empty() { ROOT_PATH } else { &path };
        writeln!(out, "{path}: {message}")?;
    }
    Ok(())
}

fn check_schema<W: Write>(schema: &Path, out: &mut W) -> Result<bool> {
    match FieldSpec::load(schema).and_then(|spec| spec.build()) {
        Ok(field) => {
            writeln!(
                out,
                "schema '{}' ok ({} fields)",
                field.label(),
                field.fields().len()
            )?;
            Ok(true)
        }
        Err(e @ SchemaError::Io { .. }) => Err(e.into()),
        Err(e) => {
            writeln!(out, "{e}")?;
            Ok(false)
        }
    }
}
