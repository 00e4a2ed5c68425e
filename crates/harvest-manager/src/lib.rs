pub mod auth;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;

pub use auth::{authenticate, AuthError};
pub use config::{load_config, ManagerConfig};
pub use controller::{HarvestJobsController, Outcome, ParsersController, View};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, ManagerError, Result};
pub use models::{HarvestJob, Parser, ParserAttributes, User, ValidationErrors};
