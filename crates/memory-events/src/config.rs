//! Configuration loading for memory-events.
//!
//! Layered config: defaults -> config file -> `--config` file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/memory-events/config.toml`.
//!
//! ```toml
//! log_level = "debug"
//!
//! [[type_aliases]]
//! name = "MemoryReprocessed"
//! shape = "memory"
//! ```
//!
//! Aliases are an array of tables so that discriminator case survives the
//! config crate's key normalization. From the environment they are given as
//! a comma-separated list of `name=shape` pairs:
//!
//! ```text
//! MEMORY_EVENTS_TYPE_ALIASES="MemoryReprocessed=memory,sync_done=memory_backward_synced"
//! ```

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::TypeRegistry;
use crate::error::EventError;
use crate::event::EventShape;
use crate::event_type::EventType;

const ENV_PREFIX: &str = "MEMORY_EVENTS";

/// Settings for tools that encode and decode lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Extra discriminators accepted on decode
    #[serde(default)]
    pub type_aliases: Vec<TypeAlias>,
}

/// An extra discriminator and the payload shape it decodes as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AliasRepr")]
pub struct TypeAlias {
    pub name: String,
    pub shape: EventShape,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, shape: EventShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// Accepted spellings of an alias: a `{name, shape}` table from a file,
/// or a `name=shape` string from the environment.
#[derive(Deserialize)]
#[serde(untagged)]
enum AliasRepr {
    Table { name: String, shape: EventShape },
    Pair(String),
}

impl TryFrom<AliasRepr> for TypeAlias {
    type Error = EventError;

    fn try_from(repr: AliasRepr) -> Result<Self, Self::Error> {
        match repr {
            AliasRepr::Table { name, shape } => Ok(TypeAlias::new(name, shape)),
            AliasRepr::Pair(pair) => {
                let (name, shape) = pair.split_once('=').ok_or_else(|| {
                    EventError::Config(format!("type alias `{pair}` is not of the form name=shape"))
                })?;
                let shape = shape
                    .trim()
                    .parse()
                    .map_err(|e| EventError::Config(format!("type alias `{pair}`: {e}")))?;
                Ok(TypeAlias::new(name.trim(), shape))
            }
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            type_aliases: Vec::new(),
        }
    }
}

/// MEMORY_EVENTS_LOG_LEVEL, MEMORY_EVENTS_TYPE_ALIASES="name=shape,..."
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("type_aliases")
}

impl EventSettings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/memory-events/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (MEMORY_EVENTS_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, EventError> {
        Self::load_with_environment(cli_config_path, env_source())
    }

    fn load_with_environment(
        cli_config_path: Option<&str>,
        environment: Environment,
    ) -> Result<Self, EventError> {
        let config_dir = ProjectDirs::from("", "", "memory-events")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| EventError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let config = builder
            .add_source(environment)
            .build()
            .map_err(|e| EventError::Config(e.to_string()))?;

        let settings: EventSettings = config
            .try_deserialize()
            .map_err(|e| EventError::Config(e.to_string()))?;

        debug!(
            log_level = %settings.log_level,
            aliases = settings.type_aliases.len(),
            "Loaded event settings"
        );
        Ok(settings)
    }

    /// Default registry extended with the configured aliases.
    pub fn registry(&self) -> Result<TypeRegistry, EventError> {
        let mut registry = TypeRegistry::with_defaults();
        for TypeAlias { name, shape } in &self.type_aliases {
            let event_type = EventType::new(name.as_str())
                .map_err(|e| EventError::Config(format!("invalid type alias `{name}`: {e}")))?;
            if let Some(previous) = registry.register(event_type, *shape) {
                debug!(alias = %name, from = %previous, to = %shape, "Type alias overrides default");
            }
        }
        Ok(registry)
    }
}
