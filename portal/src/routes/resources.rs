use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    http::StatusCode,
    web::{self, Data, Json, Path},
};
use models::{ResourceKind, Role};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{instrument, warn};

use crate::auth::AuthorizedSession;
use crate::backend::{BackendClient, BackendError, Relayed};
use crate::routes::GENERIC_FAILURE;

#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    #[error("The {role} role cannot manage {kind}")]
    Forbidden { role: Role, kind: ResourceKind },

    #[error("{0:?} is not a record id")]
    InvalidId(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ResponseError for ResourceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::InvalidId(_) => StatusCode::NOT_FOUND,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Forbidden { .. } => self.to_string(),
            Self::InvalidId(_) => "No such record".to_string(),
            Self::Backend(_) => GENERIC_FAILURE.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[derive(Deserialize)]
pub struct CollectionPath {
    kind: ResourceKind,
}

#[derive(Deserialize)]
pub struct ItemPath {
    kind: ResourceKind,
    id: String,
}

/// Mounted inside every role area; the handlers enforce the write policy.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/{kind}", web::get().to(list_resources))
        .route("/api/{kind}", web::post().to(create_resource))
        .route("/api/{kind}/{id}", web::get().to(get_resource))
        .route("/api/{kind}/{id}", web::patch().to(update_resource))
        .route("/api/{kind}/{id}", web::delete().to(delete_resource));
}

fn relay(relayed: Relayed) -> HttpResponse {
    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = HttpResponse::build(status);
    if let Some(content_type) = relayed.content_type {
        response.content_type(content_type);
    }
    response.body(relayed.body)
}

fn ensure_manages(auth: &AuthorizedSession, kind: ResourceKind) -> Result<(), ResourceError> {
    let role = auth.0.role();
    if role.can_manage(kind) {
        Ok(())
    } else {
        warn!(%role, %kind, "Write outside the role's policy refused");
        Err(ResourceError::Forbidden { role, kind })
    }
}

/// Backend path of a single record. The id must be one plain segment.
fn item_segments(path: &ItemPath) -> Result<[&str; 2], ResourceError> {
    let id = path.id.as_str();
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '?', '#']) {
        warn!(kind = %path.kind, id, "Malformed record id refused");
        return Err(ResourceError::InvalidId(path.id.clone()));
    }
    Ok([path.kind.segment(), id])
}

#[instrument(skip_all, fields(kind = %path.kind))]
pub async fn list_resources(
    auth: AuthorizedSession,
    path: Path<CollectionPath>,
    req: HttpRequest,
    backend: Data<BackendClient>,
) -> Result<HttpResponse, ResourceError> {
    let relayed = backend
        .forward(
            Method::GET,
            &[path.kind.segment()],
            req.query_string(),
            &auth.0,
            None,
        )
        .await?;
    Ok(relay(relayed))
}

#[instrument(skip_all, fields(kind = %path.kind, id = %path.id))]
pub async fn get_resource(
    auth: AuthorizedSession,
    path: Path<ItemPath>,
    backend: Data<BackendClient>,
) -> Result<HttpResponse, ResourceError> {
    let segments = item_segments(&path)?;
    let relayed = backend
        .forward(Method::GET, &segments, "", &auth.0, None)
        .await?;
    Ok(relay(relayed))
}

#[instrument(skip_all, fields(kind = %path.kind))]
pub async fn create_resource(
    auth: AuthorizedSession,
    path: Path<CollectionPath>,
    body: Json<serde_json::Value>,
    backend: Data<BackendClient>,
) -> Result<HttpResponse, ResourceError> {
    ensure_manages(&auth, path.kind)?;
    let relayed = backend
        .forward(
            Method::POST,
            &[path.kind.segment()],
            "",
            &auth.0,
            Some(body.into_inner()),
        )
        .await?;
    Ok(relay(relayed))
}

#[instrument(skip_all, fields(kind = %path.kind, id = %path.id))]
pub async fn update_resource(
    auth: AuthorizedSession,
    path: Path<ItemPath>,
    body: Json<serde_json::Value>,
    backend: Data<BackendClient>,
) -> Result<HttpResponse, ResourceError> {
    ensure_manages(&auth, path.kind)?;
    let segments = item_segments(&path)?;
    let relayed = backend
        .forward(
            Method::PATCH,
            &segments,
            "",
            &auth.0,
            Some(body.into_inner()),
        )
        .await?;
    Ok(relay(relayed))
}

#[instrument(skip_all, fields(kind = %path.kind, id = %path.id))]
pub async fn delete_resource(
    auth: AuthorizedSession,
    path: Path<ItemPath>,
    backend: Data<BackendClient>,
) -> Result<HttpResponse, ResourceError> {
    ensure_manages(&auth, path.kind)?;
    let segments = item_segments(&path)?;
    let relayed = backend
        .forward(Method::DELETE, &segments, "", &auth.0, None)
        .await?;
    Ok(relay(relayed))
}
