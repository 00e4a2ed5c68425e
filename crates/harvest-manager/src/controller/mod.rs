//! Framework-neutral request handlers.
//!
//! Controllers take an authenticated user, call into the repositories and
//! answer with an [`Outcome`]: either a view to render or a location to
//! redirect to. Transport layers decide how each outcome is encoded.

pub mod harvest_jobs;
pub mod parsers;

use serde::Serialize;

use crate::models::{HarvestJob, Parser, ValidationErrors};

pub use harvest_jobs::HarvestJobsController;
pub use parsers::ParsersController;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Index {
        parsers: Vec<Parser>,
    },
    Show {
        parser: Parser,
    },
    New {
        parser: Parser,
        errors: ValidationErrors,
    },
    /// `errors` belong to the parser form, `harvest_job_errors` to the
    /// embedded harvest job form.
    Edit {
        parser: Parser,
        harvest_job: Option<HarvestJob>,
        errors: ValidationErrors,
        harvest_job_errors: ValidationErrors,
    },
    HarvestJobs {
        parser: Parser,
        harvest_jobs: Vec<HarvestJob>,
    },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Index { .. } => "index",
            View::Show { .. } => "show",
            View::New { .. } => "new",
            View::Edit { .. } => "edit",
            View::HarvestJobs { .. } => "harvest_jobs",
        }
    }

    /// True for a form re-rendered after a failed save.
    pub fn has_errors(&self) -> bool {
        match self {
            View::New { errors, .. } => !errors.is_empty(),
            View::Edit {
                errors,
                harvest_job_errors,
                ..
            } => !errors.is_empty() || !harvest_job_errors.is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(View),
    Redirect {
        location: String,
        notice: Option<String>,
    },
}

impl Outcome {
    pub(crate) fn redirect(location: impl Into<String>) -> Self {
        Outcome::Redirect {
            location: location.into(),
            notice: None,
        }
    }

    pub(crate) fn redirect_with_notice(
        location: impl Into<String>,
        notice: impl Into<String>,
    ) -> Self {
        Outcome::Redirect {
            location: location.into(),
            notice: Some(notice.into()),
        }
    }

    /// The rendered view, if any.
    pub fn view(&self) -> Option<&View> {
        match self {
            Outcome::Render(view) => Some(view),
            Outcome::Redirect { .. } => None,
        }
    }

    /// The redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            Outcome::Redirect { location, .. } => Some(location),
            Outcome::Render(_) => None,
        }
    }
}
