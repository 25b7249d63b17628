//! GraphQL client for the Orbit API.
//!
//! The CLI only needs two queries: the Apple teams registered for an account,
//! and the devices registered under one of those teams. Both are exposed
//! through the [`DeviceQueries`] trait so command flows can run against an
//! in-memory fake in tests.

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Default endpoint of the Orbit GraphQL API.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.orbit.dev/graphql";

/// Environment variable holding a session token, overriding the token file.
pub const TOKEN_ENV_VAR: &str = "ORBIT_TOKEN";

/// Errors produced while querying the Orbit API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session token could be located.
    #[error("not logged in, set {TOKEN_ENV_VAR} or store a session token in ~/.orbit/session-token")]
    MissingCredentials,

    /// The HTTP request itself failed.
    #[error("request to the Orbit API failed")]
    Transport(#[from] reqwest::Error),

    /// The API answered but reported errors in the GraphQL envelope.
    #[error("the Orbit API reported an error: {0}")]
    Service(String),

    /// The API answered with a payload we could not interpret.
    #[error("unexpected response from the Orbit API: {0}")]
    Decode(String),
}

/// An Apple provisioning team registered for an account.
///
/// The team name is optional; teams registered through the public API only
/// carry their identifier.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppleTeam {
    /// Stable Apple team identifier (e.g. `QL9Z3XH2K4`).
    pub apple_team_identifier: String,
    /// Human-readable team name, when known.
    pub apple_team_name: Option<String>,
}

/// A device registered under an Apple team.
///
/// All payload fields besides the identifier are optional; devices registered
/// from provisioning profiles often miss name and model metadata.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppleDevice {
    /// Device UDID.
    pub identifier: String,
    /// User-assigned device name.
    pub name: Option<String>,
    /// Device class (e.g. `IPHONE`, `IPAD`).
    pub device_class: Option<String>,
    /// Marketing model name (e.g. `iPhone 15 Pro`).
    pub model: Option<String>,
    /// Whether the device is enabled on the Apple Developer Portal.
    pub enabled: Option<bool>,
    /// When the device was registered with Orbit.
    pub created_at: Option<DateTime<Utc>>,
}

/// Devices registered under one Apple team, plus the team's display name.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppleDeviceList {
    /// Display name of the team the devices belong to, when known.
    pub apple_team_name: Option<String>,
    /// Devices in registration order.
    pub apple_devices: Vec<AppleDevice>,
}

/// Remote queries the `device list` flow depends on.
///
/// Both methods perform exactly one fetch; callers await them sequentially,
/// never concurrently.
pub trait DeviceQueries {
    /// Fetch all Apple teams registered for `account`, in registration order.
    fn teams_for_account(
        &self,
        account: &str,
    ) -> impl Future<Output = Result<Vec<AppleTeam>, ApiError>>;

    /// Fetch the devices registered under `team_id` for `account`.
    fn devices_for_team(
        &self,
        account: &str,
        team_id: &str,
    ) -> impl Future<Output = Result<AppleDeviceList, ApiError>>;
}

const TEAMS_QUERY: &str = r"
query AppleTeamsByAccountName($accountName: String!) {
  account {
    byName(accountName: $accountName) {
      appleTeams {
        appleTeamIdentifier
        appleTeamName
      }
    }
  }
}";

const DEVICES_QUERY: &str = r"
query AppleDevicesByTeamIdentifier($accountName: String!, $appleTeamIdentifier: String!) {
  account {
    byName(accountName: $accountName) {
      appleTeam(appleTeamIdentifier: $appleTeamIdentifier) {
        appleTeamName
        appleDevices {
          identifier
          name
          deviceClass
          model
          enabled
          createdAt
        }
      }
    }
  }
}";

/// HTTP-backed implementation of [`DeviceQueries`].
#[derive(Debug)]
pub struct HttpClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpClient {
    /// Build a client against the default Orbit API endpoint.
    ///
    /// # Errors
    /// Returns [`ApiError::MissingCredentials`] if no session token is found.
    pub fn from_environment() -> Result<Self, ApiError> {
        let token = session_token().ok_or(ApiError::MissingCredentials)?;
        Ok(Self::new(DEFAULT_GRAPHQL_ENDPOINT, token))
    }

    /// Build a client against a specific endpoint, mainly for tests.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    async fn post_query(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        debug!(endpoint = %self.endpoint, "sending GraphQL query");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let envelope: GraphqlEnvelope = response.json().await?;
        unwrap_envelope(envelope)
    }
}

impl DeviceQueries for HttpClient {
    async fn teams_for_account(&self, account: &str) -> Result<Vec<AppleTeam>, ApiError> {
        let data = self
            .post_query(TEAMS_QUERY, json!({ "accountName": account }))
            .await?;

        let teams = data
            .pointer("/account/byName/appleTeams")
            .cloned()
            .ok_or_else(|| ApiError::Decode("missing appleTeams field".into()))?;

        serde_json::from_value(teams).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn devices_for_team(
        &self,
        account: &str,
        team_id: &str,
    ) -> Result<AppleDeviceList, ApiError> {
        let data = self
            .post_query(
                DEVICES_QUERY,
                json!({ "accountName": account, "appleTeamIdentifier": team_id }),
            )
            .await?;

        let team = data
            .pointer("/account/byName/appleTeam")
            .cloned()
            .ok_or_else(|| ApiError::Decode("missing appleTeam field".into()))?;

        if team.is_null() {
            // Unknown team identifier: treated as a team with no devices.
            return Ok(AppleDeviceList {
                apple_team_name: None,
                apple_devices: Vec::new(),
            });
        }

        serde_json::from_value(team).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Turn a GraphQL envelope into its data payload or an [`ApiError`].
///
/// A non-empty `errors` array wins over any partial `data`; an envelope with
/// neither is a decode failure.
fn unwrap_envelope(envelope: GraphqlEnvelope) -> Result<serde_json::Value, ApiError> {
    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        let joined = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ApiError::Service(joined));
    }

    envelope
        .data
        .ok_or_else(|| ApiError::Decode("missing data field".into()))
}

/// Locate the session token: environment variable first, token file second.
#[must_use]
pub fn session_token() -> Option<String> {
    if let Ok(token) = env::var(TOKEN_ENV_VAR) {
        let token = token.trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    let path = token_file_path()?;
    let contents = std::fs::read_to_string(path).ok()?;
    let token = contents.trim().to_string();
    (!token.is_empty()).then_some(token)
}

fn token_file_path() -> Option<PathBuf> {
    home::home_dir().map(|dir| dir.join(".orbit").join("session-token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_teams_with_and_without_names() {
        let payload = serde_json::json!([
            { "appleTeamIdentifier": "T1", "appleTeamName": "Alpha" },
            { "appleTeamIdentifier": "T2", "appleTeamName": null },
        ]);

        let teams: Vec<AppleTeam> = serde_json::from_value(payload).unwrap();
        assert_eq!(teams[0].apple_team_identifier, "T1");
        assert_eq!(teams[0].apple_team_name.as_deref(), Some("Alpha"));
        assert_eq!(teams[1].apple_team_identifier, "T2");
        assert_eq!(teams[1].apple_team_name, None);
    }

    #[test]
    fn deserializes_device_list_with_sparse_fields() {
        let payload = serde_json::json!({
            "appleTeamName": "Alpha",
            "appleDevices": [
                {
                    "identifier": "00008110-000A1B2C3D4E5F6G",
                    "name": "Kim's iPhone",
                    "deviceClass": "IPHONE",
                    "model": "iPhone 15 Pro",
                    "enabled": true,
                    "createdAt": "2026-01-12T09:30:00Z"
                },
                { "identifier": "udid-2" }
            ]
        });

        let list: AppleDeviceList = serde_json::from_value(payload).unwrap();
        assert_eq!(list.apple_team_name.as_deref(), Some("Alpha"));
        assert_eq!(list.apple_devices.len(), 2);
        assert_eq!(list.apple_devices[0].name.as_deref(), Some("Kim's iPhone"));
        assert!(list.apple_devices[0].created_at.is_some());
        assert_eq!(list.apple_devices[1].identifier, "udid-2");
        assert_eq!(list.apple_devices[1].model, None);
    }

    #[test]
    fn service_errors_surface_with_joined_messages() {
        let raw = r#"{
            "data": null,
            "errors": [
                { "message": "account not found" },
                { "message": "rate limited" }
            ]
        }"#;
        let envelope: GraphqlEnvelope = serde_json::from_str(raw).unwrap();

        let err = unwrap_envelope(envelope).unwrap_err();
        match err {
            ApiError::Service(message) => {
                assert_eq!(message, "account not found; rate limited");
            }
            other => panic!("expected a service error, got {other:?}"),
        }
    }

    #[test]
    fn empty_errors_array_is_not_a_service_error() {
        let raw = r#"{ "data": { "account": null }, "errors": [] }"#;
        let envelope: GraphqlEnvelope = serde_json::from_str(raw).unwrap();

        let data = unwrap_envelope(envelope).unwrap();
        assert_eq!(data, serde_json::json!({ "account": null }));
    }

    #[test]
    fn envelope_without_data_is_a_decode_error() {
        let raw = r"{}";
        let envelope: GraphqlEnvelope = serde_json::from_str(raw).unwrap();

        let err = unwrap_envelope(envelope).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
