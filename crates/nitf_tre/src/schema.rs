//! Record layout schemas.
//!
//! A schema resource is a JSON document mapping TRE tags to an ordered list of layout
//! directives:
//!
//! ```json
//! {
//!   "tres": {
//!     "BANDSA": {
//!       "prefix": "bandsa_",
//!       "layout": [
//!         { "field": { "name": "ROW_SPACING", "length": 7 } },
//!         { "field": { "name": "BANDCOUNT", "length": 4 } },
//!         { "loop": { "counter": "BANDCOUNT", "name": "BANDS", "layout": [
//!           { "field": { "name": "BANDPEAK", "length": 5 } }
//!         ] } }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! A `loop` repeats either a literal number of `iterations` or as many times as the value of
//! an earlier `counter` field in the same group. `if` directives are accepted when loading but
//! are rejected when a record that uses them is parsed.

use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::debug;

use crate::error::{Error, Result};

const BUILTIN_SCHEMAS: &str = include_str!("../resources/tre_schemas.json");

static BUILTIN: OnceCell<Arc<SchemaRegistry>> = OnceCell::new();

static LOADED: Lazy<Mutex<HashMap<PathBuf, Arc<SchemaRegistry>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// How many times a loop body repeats
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopCount {
    /// A fixed number of iterations
    Literal(usize),
    /// The integer value of an earlier field in the same group
    CounterRef(String),
}

/// A single field of fixed width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDirective {
    /// Entry name, `None` when the schema gives neither a name nor a long name
    pub name: Option<String>,
    pub length: usize,
}

/// A repeated group of directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopDirective {
    pub name: String,
    pub count: LoopCount,
    pub body: Vec<Directive>,
}

/// One step of a record layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Field(FieldDirective),
    Loop(LoopDirective),
    /// Present in source schemas but never interpreted
    Conditional { condition: String },
}

/// Layout of one TRE tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreSchema {
    pub tag: String,
    /// Cosmetic namespace prefix for the tag's fields
    pub prefix: String,
    pub layout: Vec<Directive>,
}

/// Immutable lookup from TRE tag to layout
///
/// Registries are built once and shared through an [`Arc`]; nothing mutates a registry after
/// it has been loaded.
///
/// ```
/// let registry = nitf_tre::SchemaRegistry::builtin()?;
/// assert!(registry.get("BLOCKA").is_some());
/// # Ok::<(), nitf_tre::error::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, TreSchema>,
}

#[derive(Deserialize)]
struct RawRegistry {
    tres: IndexMap<String, RawTre>,
}

#[derive(Deserialize)]
struct RawTre {
    #[serde(default)]
    prefix: String,
    layout: Vec<RawDirective>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawDirective {
    Field {
        name: Option<String>,
        longname: Option<String>,
        length: usize,
    },
    Loop {
        name: Option<String>,
        counter: Option<String>,
        iterations: Option<usize>,
        layout: Vec<RawDirective>,
    },
    If {
        cond: String,
        #[serde(default)]
        #[allow(dead_code)]
        layout: Vec<RawDirective>,
    },
}

impl SchemaRegistry {
    /// The registry embedded in this crate, loaded on first use
    pub fn builtin() -> Result<Arc<SchemaRegistry>> {
        BUILTIN
            .get_or_try_init(|| {
                debug!("loading builtin tre schemas");
                SchemaRegistry::from_json(BUILTIN_SCHEMAS).map(Arc::new)
            })
            .cloned()
    }

    /// Load a registry from a file, reusing the copy already loaded for the same path
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<SchemaRegistry>> {
        let key = path.as_ref().canonicalize()?;

        let mut loaded = LOADED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(registry) = loaded.get(&key) {
            return Ok(registry.clone());
        }

        debug!(path = %key.display(), "loading tre schemas");
        let registry = Arc::new(SchemaRegistry::from_reader(BufReader::new(File::open(&key)?))?);
        loaded.insert(key, registry.clone());
        Ok(registry)
    }

    /// Parse a registry from a JSON reader
    pub fn from_reader(reader: impl Read) -> Result<SchemaRegistry> {
        let raw: RawRegistry = serde_json::from_reader(reader)?;
        SchemaRegistry::from_raw(raw)
    }

    /// Parse a registry from a JSON string
    pub fn from_json(json: &str) -> Result<SchemaRegistry> {
        let raw: RawRegistry = serde_json::from_str(json)?;
        SchemaRegistry::from_raw(raw)
    }

    fn from_raw(raw: RawRegistry) -> Result<SchemaRegistry> {
        let schemas = raw
            .tres
            .into_iter()
            .map(|(tag, tre)| {
                let layout = convert_layout(&tag, tre.layout)?;
                let schema = TreSchema {
                    tag: tag.clone(),
                    prefix: tre.prefix,
                    layout,
                };
                Ok((tag, schema))
            })
            .collect::<Result<IndexMap<_, _>>>()?;

        Ok(SchemaRegistry { schemas })
    }

    /// Layout for `tag`, if the registry knows it
    pub fn get(&self, tag: &str) -> Option<&TreSchema> {
        self.schemas.get(tag)
    }

    /// Whether the registry knows `tag`
    pub fn contains(&self, tag: &str) -> bool {
        self.schemas.contains_key(tag)
    }

    /// Known tags, in resource order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(|s| s.as_str())
    }

    /// Number of tags in the registry
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry has no tags
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn convert_layout(tag: &str, raw: Vec<RawDirective>) -> Result<Vec<Directive>> {
    raw.into_iter()
        .map(|directive| convert_directive(tag, directive))
        .collect()
}

fn convert_directive(tag: &str, raw: RawDirective) -> Result<Directive> {
    Ok(match raw {
        RawDirective::Field {
            name,
            longname,
            length,
        } => Directive::Field(FieldDirective {
            name: usable(name).or_else(|| usable(longname)),
            length,
        }),
        RawDirective::Loop {
            name,
            counter,
            iterations,
            layout,
        } => {
            let counter = usable(counter);
            let count = match (&counter, iterations) {
                (Some(counter), None) => LoopCount::CounterRef(counter.clone()),
                (None, Some(iterations)) => LoopCount::Literal(iterations),
                _ => {
                    return Err(Error::InvalidSchema {
                        tag: tag.to_string(),
                        message: "loop needs exactly one of counter or iterations".into(),
                    })
                }
            };
            Directive::Loop(LoopDirective {
                name: usable(name).or(counter).unwrap_or_else(|| "LOOP".into()),
                count,
                body: convert_layout(tag, layout)?,
            })
        }
        RawDirective::If { cond, .. } => Directive::Conditional { condition: cond },
    })
}

fn usable(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
