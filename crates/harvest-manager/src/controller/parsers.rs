//! Parser administration actions.

use crate::db::{parser_repo, Database};
use crate::error::{ManagerError, Result};
use crate::models::parser::PARSERS_PATH;
use crate::models::{HarvestJob, Parser, ParserAttributes, SaveError, User, ValidationErrors};

use super::{Outcome, View};

/// Handles the parser resource on behalf of an authenticated user.
pub struct ParsersController<'a> {
    db: &'a Database,
    current_user: &'a User,
}

impl<'a> ParsersController<'a> {
    pub fn new(db: &'a Database, current_user: &'a User) -> Self {
        Self { db, current_user }
    }

    fn find_parser(&self, id: &str) -> Result<Parser> {
        parser_repo::find(self.db, id)?.ok_or_else(|| ManagerError::parser_not_found(id))
    }

    /// `GET /parsers`
    pub fn index(&self) -> Result<Outcome> {
        let parsers = parser_repo::all(self.db)?;
        Ok(Outcome::Render(View::Index { parsers }))
    }

    /// `GET /parsers/{id}`
    pub fn show(&self, id: &str) -> Result<Outcome> {
        let parser = self.find_parser(id)?;
        Ok(Outcome::Render(View::Show { parser }))
    }

    /// `GET /parsers/new`
    pub fn new_form(&self) -> Outcome {
        Outcome::Render(View::New {
            parser: Parser::new(),
            errors: ValidationErrors::new(),
        })
    }

    /// `GET /parsers/{id}/edit`. Also prepares a harvest job for the parser so
    /// the form can offer to start one.
    pub fn edit(&self, id: &str) -> Result<Outcome> {
        let parser = self.find_parser(id)?;
        let harvest_job = HarvestJob::from_parser(&parser, self.current_user);
        Ok(Outcome::Render(View::Edit {
            parser,
            harvest_job: Some(harvest_job),
            errors: ValidationErrors::new(),
            harvest_job_errors: ValidationErrors::new(),
        }))
    }

    /// `POST /parsers`
    pub fn create(&self, attributes: ParserAttributes) -> Result<Outcome> {
        let mut parser = Parser::from_attributes(attributes);
        match parser_repo::save(self.db, &mut parser) {
            Ok(()) => {
                tracing::info!(
                    parser_id = %parser.id,
                    name = %parser.name,
                    user_id = %self.current_user.id,
                    "Parser created"
                );
                Ok(Outcome::redirect(parser.edit_path()))
            }
            Err(SaveError::Invalid(errors)) => Ok(Outcome::Render(View::New { parser, errors })),
            Err(SaveError::Database(e)) => Err(e.into()),
        }
    }

    /// `PUT /parsers/{id}`. A request without attributes still re-saves the parser.
    pub fn update(&self, id: &str, attributes: Option<ParserAttributes>) -> Result<Outcome> {
        let mut parser = self.find_parser(id)?;
        if let Some(attributes) = attributes {
            parser.assign_attributes(attributes);
        }
        match parser_repo::save(self.db, &mut parser) {
            Ok(()) => {
                tracing::info!(
                    parser_id = %parser.id,
                    user_id = %self.current_user.id,
                    "Parser updated"
                );
                Ok(Outcome::redirect(parser.edit_path()))
            }
            Err(SaveError::Invalid(errors)) => Ok(Outcome::Render(View::Edit {
                parser,
                harvest_job: None,
                errors,
                harvest_job_errors: ValidationErrors::new(),
            })),
            Err(SaveError::Database(e)) => Err(e.into()),
        }
    }

    /// `DELETE /parsers/{id}`. Refuses while the parser has running harvest jobs.
    pub fn destroy(&self, id: &str) -> Result<Outcome> {
        let parser = self.find_parser(id)?;

        if parser_repo::running_jobs(self.db, &parser.id)? {
            tracing::warn!(
                parser_id = %parser.id,
                "Refusing to delete parser with running harvest jobs"
            );
            return Ok(Outcome::redirect_with_notice(
                PARSERS_PATH,
                format!(
                    "Parser '{}' has running harvest jobs and was not deleted",
                    parser.name
                ),
            ));
        }

        parser_repo::destroy(self.db, &parser.id)?;
        tracing::info!(
            parser_id = %parser.id,
            user_id = %self.current_user.id,
            "Parser deleted"
        );
        Ok(Outcome::redirect_with_notice(
            PARSERS_PATH,
            format!("Parser '{}' was deleted", parser.name),
        ))
    }

    /// `GET /parsers/{id}/allow_flush?allow=..`. A missing `allow` grants the flag.
    pub fn allow_flush(&self, id: &str, allow: Option<bool>) -> Result<Outcome> {
        let mut parser = self.find_parser(id)?;
        parser.allow_full_and_flush = allow.unwrap_or(true);

        match parser_repo::save(self.db, &mut parser) {
            Ok(()) => {
                tracing::info!(
                    parser_id = %parser.id,
                    allow_full_and_flush = parser.allow_full_and_flush,
                    user_id = %self.current_user.id,
                    "Updated full and flush permission"
                );
                Ok(Outcome::redirect(parser.edit_path()))
            }
            Err(SaveError::Invalid(errors)) => Ok(Outcome::Render(View::Edit {
                parser,
                harvest_job: None,
                errors,
                harvest_job_errors: ValidationErrors::new(),
            })),
            Err(SaveError::Database(e)) => Err(e.into()),
        }
    }
}
