use std::future::{Ready, ready};

use actix_session::SessionExt;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::MessageBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    error::InternalError,
    middleware::Next,
};
use chrono::Utc;
use models::{Role, SessionAuth};
use tracing::info;

use crate::auth::policy::{DenyReason, GateState};
use crate::auth::session::{current_auth, sign_out};
use crate::routes::{LOGIN_PATH, found};

/// Routing-layer guard for the role areas. Requests outside `/student`,
/// `/lecturer` and `/admin` pass untouched; inside them the handler only runs
/// once the session is authorized, and receives it as [`AuthorizedSession`].
pub async fn role_gate(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let Some(required) = Role::required_for_path(req.path()) else {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    };

    let session = req.get_session();
    let state = GateState::Unchecked.check(current_auth(&session), required, Utc::now());

    let reason = match state {
        GateState::Authorized(auth) => {
            req.extensions_mut().insert(auth);
            return next.call(req).await.map(ServiceResponse::map_into_left_body);
        }
        GateState::Denied(reason) => reason,
        GateState::Unchecked => DenyReason::NoSession,
    };

    if reason == DenyReason::Expired {
        sign_out(&session);
    }
    info!(path = %req.path(), %reason, "Redirecting to login");

    Ok(req.into_response(found(LOGIN_PATH)).map_into_right_body())
}

/// Session that passed [`role_gate`] for the current request.
pub struct AuthorizedSession(pub SessionAuth);

impl FromRequest for AuthorizedSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth = req.extensions().get::<SessionAuth>().cloned();
        match auth {
            Some(auth) => ready(Ok(AuthorizedSession(auth))),
            None => ready(Err(InternalError::from_response(
                "request did not pass the role gate",
                found(LOGIN_PATH),
            )
            .into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
    use actix_web::{
        App, HttpResponse,
        cookie::Key,
        http::{StatusCode, header},
        middleware::from_fn,
        test, web,
    };
    use chrono::Duration;
    use models::{AuthUser, SESSION_AUTH_KEY};

    use super::*;

    async fn seed_expired(session: Session) -> HttpResponse {
        let user = AuthUser {
            id: "1".to_string(),
            email: "s@x.com".to_string(),
            name: "Sam".to_string(),
            role: Role::Student,
        };
        let issued = Utc::now() - Duration::minutes(10);
        let auth = SessionAuth::issue(user, None, Duration::minutes(5), issued);
        session.insert(SESSION_AUTH_KEY, auth).unwrap();
        HttpResponse::Ok().finish()
    }

    async fn protected(auth: AuthorizedSession) -> HttpResponse {
        HttpResponse::Ok().body(auth.0.user_id().to_string())
    }

    #[actix_web::test]
    async fn expired_session_is_redirected_and_purged() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(role_gate))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_string())
                        .cookie_secure(false)
                        .build(),
                )
                .route("/seed", web::get().to(seed_expired))
                .route("/student", web::get().to(protected)),
        )
        .await;

        let seeded = test::call_service(&app, test::TestRequest::get().uri("/seed").to_request()).await;
        let cookie = seeded
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .unwrap()
            .into_owned();

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/student")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);

        let removal = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .unwrap();
        assert_eq!(removal.value(), "");
    }
}
