use std::net::TcpListener;

use actix_session::{
    SessionMiddleware,
    config::PersistentSession,
    storage::{CookieSessionStore, RedisSessionStore, SessionStore},
};
use actix_web::{
    App, HttpServer,
    cookie::{Key, time},
    dev::Server,
    middleware::{Logger, from_fn},
    web::Data,
};
use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use models::{SessionConfig, SessionStoreKind};
use tracing::{info, warn};

use crate::auth::role_gate;
use crate::auth::session::SessionTtl;
use crate::backend::BackendClient;
use crate::routes;
use crate::settings::PortalSettings;
use crate::theme::{ThemeState, log_theme_changes};

pub const SESSION_COOKIE: &str = "campus_session";

/// One year.
const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(settings: PortalSettings) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(settings.application.address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, settings).await?;
        Ok(Application { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Starts the portal on `listener`. Must be called from within a tokio runtime.
pub async fn run(listener: TcpListener, settings: PortalSettings) -> Result<Server, anyhow::Error> {
    let ttl_minutes = session_ttl_minutes(&settings.session)?;
    let backend = Data::new(BackendClient::new(&settings.backend)?);

    let theme_state = ThemeState::new(settings.theme.default);
    tokio::spawn(log_theme_changes(theme_state.subscribe()));
    let theme_state = Data::new(theme_state);

    let ttl = Data::new(SessionTtl(chrono::Duration::minutes(ttl_minutes)));
    let key = session_key(&settings.session)?;
    let shared = Shared {
        backend,
        theme_state,
        ttl,
        key,
        session: settings.session.clone(),
    };

    info!(
        address = %listener.local_addr()?,
        store = ?settings.session.store,
        "Starting portal"
    );
    match settings.session.store {
        SessionStoreKind::Cookie => serve(listener, CookieSessionStore::default, shared),
        SessionStoreKind::Redis => {
            let url = settings
                .session
                .redis_url
                .as_deref()
                .context("session.redis_url is required for the redis store")?;
            let store = RedisSessionStore::new(url).await?;
            serve(listener, move || store.clone(), shared)
        }
    }
}

#[derive(Clone)]
struct Shared {
    backend: Data<BackendClient>,
    theme_state: Data<ThemeState>,
    ttl: Data<SessionTtl>,
    key: Key,
    session: SessionConfig,
}

fn serve<S, F>(listener: TcpListener, make_store: F, shared: Shared) -> Result<Server, anyhow::Error>
where
    S: SessionStore + 'static,
    F: Fn() -> S + Send + Clone + 'static,
{
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(make_store(), shared.key.clone())
            .cookie_name(SESSION_COOKIE.to_string())
            .cookie_secure(shared.session.cookie_secure)
            .cookie_http_only(true)
            .session_lifecycle(
                PersistentSession::default()
                    .session_ttl(time::Duration::minutes(shared.session.ttl_minutes)),
            )
            .build();

        App::new()
            .wrap(from_fn(role_gate))
            .wrap(session)
            .wrap(Logger::default())
            .app_data(shared.backend.clone())
            .app_data(shared.theme_state.clone())
            .app_data(shared.ttl.clone())
            .configure(routes::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

fn session_ttl_minutes(config: &SessionConfig) -> Result<i64, anyhow::Error> {
    let minutes = config.ttl_minutes;
    if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!(
            "session.ttl_minutes must be between 1 and {}, got {}",
            MAX_SESSION_TTL_MINUTES,
            minutes
        );
    }
    Ok(minutes)
}

/// The configured signing key, or a fresh one when none is set.
fn session_key(config: &SessionConfig) -> Result<Key, anyhow::Error> {
    match &config.secret_key {
        Some(encoded) => {
            let bytes = STANDARD
                .decode(encoded.trim())
                .context("session.secret_key is not valid base64")?;
            Key::try_from(bytes.as_slice()).context("session.secret_key must be at least 64 bytes")
        }
        None => {
            warn!("No session.secret_key configured, sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}
