//! Shared test utilities for the HTTP integration tests.
//!
//! `TestApp` wires an in-memory database, a signed-in user and the full
//! router, and offers helpers for sending authenticated requests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use harvest_manager::db::{harvest_job_repo, parser_repo, user_repo};
use harvest_manager::models::{HarvestJob, JobStatus};
use harvest_manager::{Database, ManagerConfig, Parser, ParserAttributes, User};
use harvest_manager_server::Server;

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub struct TestApp {
    pub db: Database,
    pub user: User,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("Failed to create test database");
        let user = User::new("Harvest Admin", "admin@example.com");
        user_repo::insert(&db, &user).expect("Failed to insert test user");
        let router = Server::new(ManagerConfig::default(), db.clone()).router();
        Self { db, user, router }
    }

    pub fn token(&self) -> String {
        format!("Bearer {}", self.user.authentication_token)
    }

    pub fn parser(&self, name: &str) -> Parser {
        let mut parser = Parser::from_attributes(ParserAttributes::named(name));
        parser_repo::save(&self.db, &mut parser).expect("Failed to save parser");
        parser
    }

    pub fn job(&self, parser: &Parser, status: JobStatus) -> HarvestJob {
        let mut job = HarvestJob::from_parser(parser, &self.user);
        job.status = status;
        harvest_job_repo::insert(&self.db, &job).expect("Failed to insert job");
        job
    }

    pub fn reload(&self, parser: &Parser) -> Option<Parser> {
        parser_repo::find(&self.db, &parser.id).expect("Failed to load parser")
    }

    /// Sends a request with the test user's token.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_as(Some(&self.token()), method, uri, body).await
    }

    pub async fn send_as(
        &self,
        authorization: Option<&str>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            location,
            body,
        }
    }
}
