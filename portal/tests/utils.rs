#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use models::{
    ApplicationConfig, BackendConfig, SessionConfig, SessionStoreKind, Theme, ThemeConfig,
};
use portal::PortalSettings;
use reqwest::redirect::Policy;
use serde_json::{Value, json};

/// A request the stub backend received.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub user_role: Option<String>,
    pub body: Value,
}

struct StubState {
    failing: Vec<String>,
    requests: Mutex<Vec<Recorded>>,
}

/// Stand-in for the REST backend. Knows three accounts, one per role.
pub struct StubBackend {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubBackend {
    pub fn hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

const ACCOUNTS: [(&str, &str, &str, &str, &str); 3] = [
    ("1", "student@x.com", "student-pass", "Sam Student", "student"),
    ("2", "lecturer@x.com", "lecturer-pass", "Lee Lecturer", "lecturer"),
    ("3", "admin@x.com", "admin-pass", "Ada Admin", "admin"),
];

fn fixtures(kind: &str) -> Option<Value> {
    let fixture = match kind {
        "courses" => json!([{ "id": 1, "title": "Compilers", "code": "CS-401" }]),
        "assignments" => json!([{ "id": 10, "title": "Lexer", "course": "Compilers", "dueDate": "2026-11-01" }]),
        "events" => json!([{ "id": 20, "title": "Open day", "location": "Main hall" }]),
        "submissions" => json!([{ "id": 30, "assignment": "Lexer", "status": "graded", "grade": 92 }]),
        "lessons" => json!([{ "id": 40, "title": "Intro to parsing" }]),
        "quizzes" | "exams" => json!([]),
        _ => return None,
    };
    Some(fixture)
}

async fn stub(req: HttpRequest, body: web::Bytes, state: web::Data<StubState>) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(Recorded {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: header("authorization"),
        user_role: header("x-user-role"),
        body: body.clone(),
    });

    let segments: Vec<&str> = req
        .path()
        .trim_start_matches("/api/")
        .split('/')
        .collect();

    match (req.method().as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => {
            let account = ACCOUNTS.iter().find(|(_, email, password, _, _)| {
                body["email"] == *email && body["password"] == *password
            });
            match account {
                Some((id, email, _, name, role)) => HttpResponse::Ok().json(json!({
                    "user": { "id": id.parse::<i64>().unwrap(), "email": email, "name": name, "role": role },
                    "token": format!("token-{}", role),
                })),
                None => HttpResponse::Unauthorized().json(json!({ "message": "Invalid credentials" })),
            }
        }
        ("POST", ["auth", "register"]) => {
            if body["email"] == "taken@x.com" {
                HttpResponse::Conflict().json(json!({ "message": "Email already registered" }))
            } else {
                HttpResponse::Created().json(json!({ "id": 99 }))
            }
        }
        ("GET", [kind]) => {
            if state.failing.iter().any(|failing| failing == kind) {
                return HttpResponse::InternalServerError().json(json!({ "error": "boom" }));
            }
            match fixtures(kind) {
                Some(fixture) => HttpResponse::Ok().json(fixture),
                None => HttpResponse::NotFound().finish(),
            }
        }
        ("POST", [_]) => HttpResponse::Created().json(body),
        ("GET", [_, "missing"]) => {
            HttpResponse::NotFound().json(json!({ "message": "No such record" }))
        }
        ("GET", [_, id]) => HttpResponse::Ok().json(json!({ "id": id })),
        ("PATCH", [_, _]) => HttpResponse::Ok().json(body),
        ("DELETE", [_, _]) => HttpResponse::NoContent().finish(),
        _ => HttpResponse::NotFound().finish(),
    }
}

/// Starts the stub backend. Collections named in `failing` answer with 500.
pub async fn spawn_backend(failing: &[&str]) -> StubBackend {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Unable to start tcp listener");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(StubState {
        failing: failing.iter().map(|kind| kind.to_string()).collect(),
        requests: Mutex::new(Vec::new()),
    });

    let data = web::Data::from(state.clone());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .default_service(web::to(stub))
    })
    .workers(1)
    .listen(listener)
    .expect("Unable to listen")
    .run();
    tokio::spawn(server);

    StubBackend {
        base_url: format!("http://127.0.0.1:{}/api", port),
        state,
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

pub fn test_settings(backend_url: &str) -> PortalSettings {
    PortalSettings {
        application: ApplicationConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        backend: BackendConfig {
            base_url: backend_url.to_string(),
            timeout_seconds: Some(5),
        },
        session: SessionConfig {
            store: SessionStoreKind::Cookie,
            redis_url: None,
            secret_key: None,
            ttl_minutes: 30,
            cookie_secure: false,
        },
        theme: ThemeConfig {
            default: Theme::System,
        },
    }
}

pub async fn spawn_app(backend_url: &str) -> TestApp {
    spawn_app_with(test_settings(backend_url)).await
}

pub async fn spawn_app_with(settings: PortalSettings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Unable to start tcp listener");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    let server = portal::run(listener, settings)
        .await
        .expect("Unable to run the app");
    let _ = tokio::spawn(async {
        server.await.expect("Unable to start server");
    });

    TestApp {
        address,
        client: new_client(),
    }
}

pub fn new_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("No location header")
        .to_str()
        .unwrap()
}
