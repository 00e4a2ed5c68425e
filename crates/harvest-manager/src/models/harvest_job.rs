//! Harvest jobs: a unit of harvesting work started from a parser by a user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Parser, UnknownVariant, User, ValidationErrors};

macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Target environment the harvest writes into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Staging,
    Production,
}

labelled_enum!(Environment, "environment", {
    Staging => "staging",
    Production => "production",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestMode {
    #[default]
    Normal,
    /// Re-harvest everything and flush records that were not seen.
    FullAndFlush,
    Incremental,
}

labelled_enum!(HarvestMode, "harvest mode", {
    Normal => "normal",
    FullAndFlush => "full_and_flush",
    Incremental => "incremental",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Ready,
    Active,
    Paused,
    Stopped,
    Finished,
    Failed,
}

labelled_enum!(JobStatus, "job status", {
    Ready => "ready",
    Active => "active",
    Paused => "paused",
    Stopped => "stopped",
    Finished => "finished",
    Failed => "failed",
});

impl JobStatus {
    /// Statuses that block deleting the owning parser.
    pub const RUNNING: [JobStatus; 3] = [JobStatus::Ready, JobStatus::Active, JobStatus::Paused];

    pub fn is_running(&self) -> bool {
        Self::RUNNING.contains(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestJob {
    pub id: String,
    pub parser_id: String,
    pub user_id: String,
    pub environment: Environment,
    pub mode: HarvestMode,
    pub status: JobStatus,
    pub limit: Option<u32>,
    pub records_count: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submitted harvest job fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HarvestJobAttributes {
    pub environment: Option<Environment>,
    pub mode: Option<HarvestMode>,
    pub limit: Option<u32>,
}

impl HarvestJob {
    /// Builds an unsaved job for `parser`, started by `user`.
    pub fn from_parser(parser: &Parser, user: &User) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            parser_id: parser.id.clone(),
            user_id: user.id.clone(),
            environment: Environment::default(),
            mode: HarvestMode::default(),
            status: JobStatus::default(),
            limit: None,
            records_count: 0,
            start_time: None,
            end_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn assign_attributes(&mut self, attributes: HarvestJobAttributes) {
        if let Some(environment) = attributes.environment {
            self.environment = environment;
        }
        if let Some(mode) = attributes.mode {
            self.mode = mode;
        }
        if attributes.limit.is_some() {
            self.limit = attributes.limit;
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    pub fn validate(&self, parser: &Parser) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.parser_id != parser.id {
            errors.add("parser_id", "does not match the parser");
        }
        if self.mode == HarvestMode::FullAndFlush && !parser.allow_full_and_flush {
            errors.add("mode", "full and flush is not allowed for this parser");
        }
        if self.limit == Some(0) {
            errors.add("limit", "must be greater than 0");
        }
        errors
    }

    /// Moves a running job to `stopped`. Returns false if it was not running.
    pub fn stop(&mut self, at: DateTime<Utc>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.status = JobStatus::Stopped;
        self.end_time = Some(at);
        self.updated_at = at;
        true
    }
}
