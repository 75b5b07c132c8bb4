//! CLI command implementations
//!
//! Each operation command loads the config and data file, builds the view
//! catalog, reads one JSON request from stdin and writes one JSON
//! response to stdout. Mutations write the data file back.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::observability::{Logger, Severity};
use crate::projection::Projection;
use crate::selector::Selector;
use crate::store::{FindOptions, MemoryStore, SharedStore, UpdateOptions};
use crate::view::{Predicate, View, ViewCatalog, ViewError};

use super::args::{Command, Target};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON array of documents; relative paths resolve against the
    /// config file's directory (required)
    pub data_file: String,

    /// Name the collection is registered under (optional, default "documents")
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// View definitions by name
    #[serde(default)]
    pub views: BTreeMap<String, ViewDefinition>,

    #[serde(skip)]
    base_dir: PathBuf,
}

/// One configured view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// Collection or view this one narrows
    pub source: String,

    /// Narrowing selector
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Selector>,

    /// Field projection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Projection>,
}

fn default_collection() -> String {
    "documents".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.trim().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        if self.collection.trim().is_empty() {
            return Err(CliError::config_error("collection must not be empty"));
        }

        self.severity()?;

        if self.views.contains_key(&self.collection) {
            return Err(CliError::config_error(format!(
                "View '{}' shadows the collection name",
                self.collection
            )));
        }

        for (name, definition) in &self.views {
            if definition.source == *name {
                return Err(CliError::config_error(format!(
                    "View '{}' cannot be its own source",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be trace, info, warn or error.",
                self.log_level
            ))
        })
    }

    /// Resolved path of the data file
    pub fn data_path(&self) -> PathBuf {
        let path = Path::new(&self.data_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// A single CLI operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Find,
    FindOne,
    Update,
    Remove,
    Upsert,
    Explain,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Find => "find",
            Operation::FindOne => "find-one",
            Operation::Update => "update",
            Operation::Remove => "remove",
            Operation::Upsert => "upsert",
            Operation::Explain => "explain",
        }
    }

    /// True if the operation can change stored documents
    pub fn is_mutation(&self) -> bool {
        matches!(self, Operation::Update | Operation::Remove | Operation::Upsert)
    }
}

/// Request read from stdin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    /// Caller selector; a bare string or number is an `_id`
    #[serde(default)]
    pub selector: Selector,

    /// Read options (find, find-one, explain)
    #[serde(default)]
    pub options: FindOptions,

    /// Modifier (update, upsert)
    #[serde(default)]
    pub modifier: Option<Value>,

    /// Apply to every match (update, upsert)
    #[serde(default)]
    pub multi: bool,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Find { target } => run_operation(&target, Operation::Find),
        Command::FindOne { target } => run_operation(&target, Operation::FindOne),
        Command::Update { target } => run_operation(&target, Operation::Update),
        Command::Remove { target } => run_operation(&target, Operation::Remove),
        Command::Upsert { target } => run_operation(&target, Operation::Upsert),
        Command::Explain { target } => run_operation(&target, Operation::Explain),
        Command::Views { config } => {
            let config = Config::load(&config)?;
            write_response(list_views(&config))
        }
    }
}

fn run_operation(target: &Target, operation: Operation) -> CliResult<()> {
    let request = read_request()?;

    match execute(&target.config, target.view.as_deref(), operation, request) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Runs one operation through the named view (or the whole collection)
/// and returns the response data
pub fn execute(
    config_path: &Path,
    view_name: Option<&str>,
    operation: Operation,
    request: Value,
) -> CliResult<Value> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let data_path = config.data_path();
    let store = Arc::new(if data_path.exists() {
        MemoryStore::load(&data_path)?
    } else {
        MemoryStore::new()
    });

    let shared: SharedStore = store.clone();
    let catalog = build_catalog(&config, shared)?;

    let view_name = view_name.unwrap_or(config.collection.as_str());
    let view = catalog.open(view_name).map_err(|e| match e {
        ViewError::InvalidSource(name) => CliError::unknown_view(&name),
        other => other.into(),
    })?;

    let request: Request = serde_json::from_value(request)
        .map_err(|e| CliError::invalid_request(format!("Invalid request: {}", e)))?;

    Logger::info(
        "CLI_OPERATION",
        &[("operation", operation.as_str()), ("view", view_name)],
    );

    let data = apply(&view, operation, request)?;

    if operation.is_mutation() {
        store.save(&data_path)?;
    }

    Ok(data)
}

fn apply(view: &View, operation: Operation, request: Request) -> CliResult<Value> {
    let Request {
        selector,
        options,
        modifier,
        multi,
    } = request;
    let update_options = UpdateOptions { multi };

    let data = match operation {
        Operation::Find => Value::Array(view.find(selector, options)?.fetch()),
        Operation::FindOne => view.find_one(selector, options)?.unwrap_or(Value::Null),
        Operation::Update => {
            let modifier = required_modifier(modifier, operation)?;
            let updated = view.update(selector, &modifier, update_options)?;
            json!({ "updated": updated })
        }
        Operation::Remove => json!({ "removed": view.remove(selector)? }),
        Operation::Upsert => {
            let modifier = required_modifier(modifier, operation)?;
            serde_json::to_value(view.upsert(selector, &modifier, update_options)?)?
        }
        Operation::Explain => serde_json::to_value(view.explain(selector, options))?,
    };

    Ok(data)
}

fn required_modifier(modifier: Option<Value>, operation: Operation) -> CliResult<Value> {
    modifier.ok_or_else(|| {
        CliError::invalid_request(format!("'{}' requires a modifier", operation.as_str()))
    })
}

/// Registers the collection and defines every configured view.
///
/// Views may name each other in any order; each is defined once its
/// source exists. A source that never appears fails as a config error.
pub fn build_catalog(config: &Config, store: SharedStore) -> CliResult<ViewCatalog> {
    let mut catalog = ViewCatalog::new();
    catalog.register_collection(config.collection.clone(), store)?;

    let mut pending: Vec<(&String, &ViewDefinition)> = config.views.iter().collect();

    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|(_, definition)| catalog.resolve(&definition.source).is_ok());

        // Nothing resolvable: define the first so it reports its source.
        let (name, definition) = pending.remove(ready.unwrap_or(0));

        let predicate = definition.predicate.clone().map(Predicate::from);
        catalog
            .define(name.clone(), &definition.source, predicate, definition.fields.clone())
            .map_err(|e| match e {
                ViewError::InvalidSource(source) => CliError::config_error(format!(
                    "View '{}' has invalid source '{}'",
                    name, source
                )),
                other => other.into(),
            })?;
    }

    Ok(catalog)
}

fn list_views(config: &Config) -> Value {
    let views: Vec<Value> = config
        .views
        .iter()
        .map(|(name, definition)| {
            json!({
                "name": name,
                "source": definition.source,
                "where": definition.predicate,
                "fields": definition.fields,
            })
        })
        .collect();

    json!({
        "collection": config.collection,
        "views": views,
    })
}
