use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{Activity, LeaderboardEntry, Team, User, UserUpdate, Workout};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),
    #[error("HTTP error fetching {resource}! status: {status}")]
    Status { resource: &'static str, status: u16 },
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response for {resource}: {message}")]
    Decode {
        resource: &'static str,
        message: String,
    },
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status behind the error, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode { .. } | ApiError::InvalidUrl(_) => None,
        }
    }
}

/// A list endpoint may answer with a bare array or a paginated envelope
/// carrying the array under `results`.
pub fn decode_collection<T: DeserializeOwned>(
    resource: &'static str,
    body: &str,
) -> Result<Vec<T>, ApiError> {
    let decode_error = |message: String| ApiError::Decode { resource, message };
    let value: Value = serde_json::from_str(body).map_err(|err| decode_error(err.to_string()))?;
    let items = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(results @ Value::Array(_)) => results,
            _ => return Err(decode_error("expected a `results` list".to_string())),
        },
        _ => return Err(decode_error("expected a list".to_string())),
    };
    serde_json::from_value(items).map_err(|err| decode_error(err.to_string()))
}

/// Picks the message a failed save should surface: `detail`, then the first
/// field validation message, then the status code.
pub fn rejection_message(status: u16, body: &str) -> String {
    let fallback = || format!("HTTP error! status: {status}");
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    if let Some(detail) = value.get("detail").and_then(Value::as_str) {
        return detail.to_string();
    }

    value
        .as_object()
        .and_then(|fields| {
            fields.iter().find_map(|(field, messages)| {
                let message = match messages {
                    Value::String(text) => Some(text.as_str()),
                    Value::Array(items) => items.iter().find_map(Value::as_str),
                    _ => None,
                }?;
                Some(format!("{field}: {message}"))
            })
        })
        .unwrap_or_else(fallback)
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        let client = Client::builder()
            .user_agent("octofit-tui")
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    pub fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        self.fetch("users")
    }

    pub fn fetch_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.fetch("teams")
    }

    pub fn fetch_activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.fetch("activities")
    }

    pub fn fetch_workouts(&self) -> Result<Vec<Workout>, ApiError> {
        self.fetch("workouts")
    }

    pub fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.fetch("leaderboard")
    }

    pub fn update_user(&self, id: u64, update: &UserUpdate) -> Result<User, ApiError> {
        let url = self.endpoint(&format!("users/{id}/"))?;
        tracing::debug!(%url, "Saving user");
        let response = self
            .client
            .put(url)
            .json(update)
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let status = response.status();
        let body = read_body(response)?;
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status.as_u16(), &body),
            });
        }

        serde_json::from_str(&body).map_err(|err| ApiError::Decode {
            resource: "users",
            message: err.to_string(),
        })
    }

    fn fetch<T: DeserializeOwned>(&self, resource: &'static str) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(&format!("{resource}/"))?;
        tracing::debug!(%url, "Fetching {resource}");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                resource,
                status: response.status().as_u16(),
            });
        }

        let body = read_body(response)?;
        let items = decode_collection(resource, &body)?;
        tracing::debug!(count = items.len(), "Received {resource}");
        Ok(items)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }
}

fn read_body(response: Response) -> Result<String, ApiError> {
    response
        .text()
        .map_err(|err| ApiError::Network(err.to_string()))
}
