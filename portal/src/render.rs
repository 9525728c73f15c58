use actix_web::{HttpResponse, http::StatusCode};
use models::{SessionAuth, Theme};

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps `body` in the shared layout. `body` must already be escaped.
pub fn page(title: &str, theme: Theme, viewer: Option<&SessionAuth>, body: &str) -> String {
    let nav = match viewer {
        Some(auth) => format!(
            r#"<a href="{area}">Dashboard</a> <a href="/courses">Courses</a>
<span class="viewer">{name} ({role})</span>
<form method="post" action="/logout"><button type="submit">Sign out</button></form>"#,
            area = auth.role().area(),
            name = escape(auth.display_name()),
            role = auth.role(),
        ),
        None => r#"<a href="/">Home</a> <a href="/courses">Courses</a> <a href="/login">Sign in</a> <a href="/register">Register</a>"#
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} | Campus</title>
</head>
<body>
<nav>{nav}</nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

pub fn html(status: StatusCode, document: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(document)
}

/// Inline error block shown in place of failed content.
pub fn inline_error(message: &str) -> String {
    format!(r#"<p class="error" role="alert">{}</p>"#, escape(message))
}
