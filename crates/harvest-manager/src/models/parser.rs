//! Parser configuration records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UnknownVariant, ValidationErrors};

/// Kind of record a parser produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Record,
    Concept,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Record => "record",
            DataType::Concept => "concept",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record" => Ok(DataType::Record),
            "concept" => Ok(DataType::Concept),
            other => Err(UnknownVariant {
                kind: "data type",
                value: other.to_string(),
            }),
        }
    }
}

/// A stored harvest parser definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parser {
    pub id: String,
    pub name: String,
    /// Harvest strategy label (`xml`, `json`, `oai`, ...).
    pub strategy: String,
    /// Parser source text.
    pub content: String,
    pub data_type: DataType,
    pub source_id: Option<String>,
    /// Whether harvest jobs may run in full-and-flush mode.
    pub allow_full_and_flush: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mass-assignable parser attributes. Absent keys leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserAttributes {
    pub name: Option<String>,
    pub strategy: Option<String>,
    pub content: Option<String>,
    pub data_type: Option<DataType>,
    /// An empty string clears the source.
    pub source_id: Option<String>,
    pub allow_full_and_flush: Option<bool>,
}

impl ParserAttributes {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A blank, unsaved parser.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            strategy: "xml".to_string(),
            content: String::new(),
            data_type: DataType::default(),
            source_id: None,
            allow_full_and_flush: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_attributes(attributes: ParserAttributes) -> Self {
        let mut parser = Self::new();
        parser.assign_attributes(attributes);
        parser
    }

    pub fn assign_attributes(&mut self, attributes: ParserAttributes) {
        if let Some(name) = attributes.name {
            self.name = name.trim().to_string();
        }
        if let Some(strategy) = attributes.strategy {
            self.strategy = strategy;
        }
        if let Some(content) = attributes.content {
            self.content = content;
        }
        if let Some(data_type) = attributes.data_type {
            self.data_type = data_type;
        }
        if let Some(source_id) = attributes.source_id {
            self.source_id = if source_id.trim().is_empty() {
                None
            } else {
                Some(source_id)
            };
        }
        if let Some(allow) = attributes.allow_full_and_flush {
            self.allow_full_and_flush = allow;
        }
    }

    /// Route parameter identifying this parser.
    pub fn to_param(&self) -> &str {
        &self.id
    }

    pub fn edit_path(&self) -> String {
        edit_parser_path(self.to_param())
    }

    /// Checks that do not need the database. Name uniqueness is checked on save.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "can't be blank");
        }
        if self.strategy.trim().is_empty() {
            errors.add("strategy", "can't be blank");
        }
        errors
    }
}

pub const PARSERS_PATH: &str = "/parsers";

pub fn edit_parser_path(id: &str) -> String {
    format!("{}/{}/edit", PARSERS_PATH, id)
}
