//! Harvest job actions nested under a parser.

use chrono::Utc;

use crate::db::{harvest_job_repo, parser_repo, Database};
use crate::error::{ManagerError, Result};
use crate::models::{HarvestJob, HarvestJobAttributes, Parser, User, ValidationErrors};

use super::{Outcome, View};

pub struct HarvestJobsController<'a> {
    db: &'a Database,
    current_user: &'a User,
}

impl<'a> HarvestJobsController<'a> {
    pub fn new(db: &'a Database, current_user: &'a User) -> Self {
        Self { db, current_user }
    }

    fn find_parser(&self, id: &str) -> Result<Parser> {
        parser_repo::find(self.db, id)?.ok_or_else(|| ManagerError::parser_not_found(id))
    }

    /// `GET /parsers/{parser_id}/harvest_jobs`
    pub fn index(&self, parser_id: &str) -> Result<Outcome> {
        let parser = self.find_parser(parser_id)?;
        let harvest_jobs = harvest_job_repo::for_parser(self.db, &parser.id)?;
        Ok(Outcome::Render(View::HarvestJobs {
            parser,
            harvest_jobs,
        }))
    }

    /// `POST /parsers/{parser_id}/harvest_jobs`. Invalid jobs re-render the
    /// parser's edit form with the errors under `harvest_job_errors`.
    pub fn create(&self, parser_id: &str, attributes: HarvestJobAttributes) -> Result<Outcome> {
        let parser = self.find_parser(parser_id)?;
        let mut job = HarvestJob::from_parser(&parser, self.current_user);
        job.assign_attributes(attributes);

        let harvest_job_errors = job.validate(&parser);
        if !harvest_job_errors.is_empty() {
            return Ok(Outcome::Render(View::Edit {
                parser,
                harvest_job: Some(job),
                errors: ValidationErrors::new(),
                harvest_job_errors,
            }));
        }

        harvest_job_repo::insert(self.db, &job)?;
        tracing::info!(
            harvest_job_id = %job.id,
            parser_id = %parser.id,
            mode = %job.mode,
            environment = %job.environment,
            user_id = %self.current_user.id,
            "Harvest job queued"
        );
        Ok(Outcome::redirect_with_notice(
            parser.edit_path(),
            "Harvest job queued",
        ))
    }

    /// `PUT /harvest_jobs/{id}/stop`
    pub fn stop(&self, id: &str) -> Result<Outcome> {
        let mut job = harvest_job_repo::find(self.db, id)?
            .ok_or_else(|| ManagerError::harvest_job_not_found(id))?;
        let location = crate::models::parser::edit_parser_path(&job.parser_id);

        if !job.stop(Utc::now()) {
            return Ok(Outcome::redirect_with_notice(
                location,
                format!("Harvest job is already {}", job.status),
            ));
        }

        harvest_job_repo::update(self.db, &job)?;
        tracing::info!(
            harvest_job_id = %job.id,
            user_id = %self.current_user.id,
            "Harvest job stopped"
        );
        Ok(Outcome::redirect_with_notice(location, "Harvest job stopped"))
    }
}
