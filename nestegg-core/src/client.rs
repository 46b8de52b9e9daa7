use crate::montecarlo::SimulationOutcome;
use crate::projection::ProjectionYear;
use crate::scenario::{Assumptions, SavedScenario};
use log::debug;
use nestegg_common::{NestEggError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Per-session credential state. Every outgoing call reads it; nothing
/// else holds the token.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID", default)]
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    error: Option<String>,
}

/// Blocking client for the calculation backend. Requests are single-shot;
/// failures surface as one error and are never retried here.
pub struct ApiClient {
    base_url: String,
    http: Client,
    pub session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http: Client::new(),
            session: SessionContext::default(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.session.token = Some(token.into());
        self
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(&body)
            .send()
            .map_err(|e| NestEggError::Http(e.to_string()))?;
        check_status(resp).map(|_| ())
    }

    /// Logs in and stores the returned bearer token in the session.
    pub fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&Credentials { email, password })
            .send()
            .map_err(|e| NestEggError::Http(e.to_string()))?;
        let resp = check_status(resp)?;
        let tok: TokenResponse = resp
            .json()
            .map_err(|e| NestEggError::Http(e.to_string()))?;
        self.session.token = Some(tok.token);
        Ok(())
    }

    pub fn me(&self) -> Result<User> {
        self.get_json("/user/me")
    }

    pub fn calculate(&self, assumptions: &Assumptions) -> Result<Vec<ProjectionYear>> {
        assumptions.validate()?;
        self.post_json("/calculate", assumptions)
    }

    pub fn monte_carlo(&self, assumptions: &Assumptions) -> Result<SimulationOutcome> {
        assumptions.validate()?;
        self.post_json("/montecarlo", assumptions)
    }

    pub fn list_scenarios(&self) -> Result<Vec<SavedScenario>> {
        self.get_json("/scenarios")
    }

    pub fn save_scenario(&self, scenario: &SavedScenario) -> Result<()> {
        let resp = self
            .authed(self.http.post(self.url("/scenarios")).json(scenario))
            .send()
            .map_err(|e| NestEggError::Http(e.to_string()))?;
        check_status(resp).map(|_| ())
    }

    pub fn delete_scenario(&self, id: u64) -> Result<()> {
        let resp = self
            .authed(self.http.delete(self.url(&format!("/scenarios/{id}"))))
            .send()
            .map_err(|e| NestEggError::Http(e.to_string()))?;
        check_status(resp).map(|_| ())
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let resp = self
            .authed(self.http.get(self.url(path)))
            .send()
            .map_err(|e| NestEggError::Http(e.to_string()))?;
        check_status(resp)?
            .json()
            .map_err(|e| NestEggError::Http(e.to_string()))
    }

    fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", path);
        let resp = self
            .authed(self.http.post(self.url(path)).json(body))
            .send()
            .map_err(|e| NestEggError::Http(e.to_string()))?;
        check_status(resp)?
            .json()
            .map_err(|e| NestEggError::Http(e.to_string()))
    }
}

fn check_status(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ApiMessage>()
        .ok()
        .and_then(|m| m.error)
        .unwrap_or_else(|| status.to_string());
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(NestEggError::Auth(message));
    }
    Err(NestEggError::Api {
        status: status.as_u16(),
        message,
    })
}
