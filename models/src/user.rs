use serde::{Deserialize, Serialize};

use crate::{Role, resource::flexible_id};

/// User record returned by the backend's authentication endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthUser {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
}

#[derive(Deserialize, Debug)]
pub struct AuthResponse {
    pub user: AuthUser,
    /// Bearer token for resource requests, when the backend issues one.
    #[serde(default, alias = "accessToken")]
    pub token: Option<String>,
}

/// Error body the backend attaches to rejected requests.
#[derive(Deserialize, Debug, Default)]
pub struct BackendMessage {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}
