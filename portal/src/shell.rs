//! Role dashboards. Four collections are fetched concurrently and each
//! panel renders on its own: a failed fetch becomes an inline message in
//! that panel and nothing else.

use models::{Assignment, Course, Event, ResourceKind, Role, SessionAuth, Submission};
use tracing::warn;

use crate::backend::{BackendClient, BackendError};
use crate::render::{escape, inline_error};

pub enum Panel<T> {
    Ready(Vec<T>),
    Failed,
}

impl<T> Panel<T> {
    pub fn from_fetch(kind: ResourceKind, fetched: Result<Vec<T>, BackendError>) -> Self {
        match fetched {
            Ok(items) => Panel::Ready(items),
            Err(e) => {
                warn!(panel = %kind, error = %e, "Dashboard panel failed to load");
                Panel::Failed
            }
        }
    }
}

pub trait PanelRow {
    fn row(&self) -> String;
}

fn detail(label: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => {
            format!(r#" <span class="detail">{}: {}</span>"#, label, escape(value))
        }
        _ => String::new(),
    }
}

impl PanelRow for Course {
    fn row(&self) -> String {
        let code = self
            .code
            .as_deref()
            .map(|code| format!("{} ", escape(code)))
            .unwrap_or_default();
        format!(
            "<li>{}{}{}</li>",
            code,
            escape(&self.title),
            detail("About", self.description.as_deref())
        )
    }
}

impl PanelRow for Assignment {
    fn row(&self) -> String {
        format!(
            "<li>{}{}{}</li>",
            escape(&self.title),
            detail("Course", self.course.as_deref()),
            detail("Due", self.due_date.as_deref())
        )
    }
}

impl PanelRow for Event {
    fn row(&self) -> String {
        format!(
            "<li>{}{}{}</li>",
            escape(&self.title),
            detail("When", self.date.as_deref()),
            detail("Where", self.location.as_deref())
        )
    }
}

impl PanelRow for Submission {
    fn row(&self) -> String {
        let label = self.assignment.as_deref().unwrap_or(self.id.as_str());
        format!(
            "<li>{}{}{}{}</li>",
            escape(label),
            detail("Student", self.student.as_deref()),
            detail("Status", self.status.as_deref()),
            detail("Grade", self.grade.as_deref())
        )
    }
}

impl<T: PanelRow> Panel<T> {
    pub fn render(&self, title: &str) -> String {
        let content = match self {
            Panel::Failed => inline_error(&format!("Could not load {}.", title.to_lowercase())),
            Panel::Ready(items) if items.is_empty() => r#"<p class="empty">Nothing here yet.</p>"#.to_string(),
            Panel::Ready(items) => {
                let rows: String = items.iter().map(PanelRow::row).collect();
                format!("<ul>{rows}</ul>")
            }
        };
        format!(
            r#"<section class="panel"><h2>{}</h2>{}</section>"#,
            escape(title),
            content
        )
    }
}

pub struct ShellData {
    pub courses: Panel<Course>,
    pub assignments: Panel<Assignment>,
    pub events: Panel<Event>,
    pub submissions: Panel<Submission>,
}

/// Fetches every collection of the dashboard at once. Non-admin lists are
/// scoped to the viewer.
pub async fn load(backend: &BackendClient, auth: &SessionAuth) -> ShellData {
    let scope: Vec<(&str, &str)> = match auth.role() {
        Role::Admin => vec![],
        role => vec![("userId", auth.user_id()), ("role", role.as_str())],
    };

    let (courses, assignments, events, submissions) = futures::join!(
        backend.list::<Course>(ResourceKind::Courses, Some(auth), &scope),
        backend.list::<Assignment>(ResourceKind::Assignments, Some(auth), &scope),
        backend.list::<Event>(ResourceKind::Events, Some(auth), &scope),
        backend.list::<Submission>(ResourceKind::Submissions, Some(auth), &scope),
    );

    ShellData {
        courses: Panel::from_fetch(ResourceKind::Courses, courses),
        assignments: Panel::from_fetch(ResourceKind::Assignments, assignments),
        events: Panel::from_fetch(ResourceKind::Events, events),
        submissions: Panel::from_fetch(ResourceKind::Submissions, submissions),
    }
}

/// Heading and panel titles of each role's dashboard.
pub struct Layout {
    pub heading: &'static str,
    pub courses: &'static str,
    pub assignments: &'static str,
    pub submissions: &'static str,
    pub events: &'static str,
}

pub fn layout(role: Role) -> Layout {
    match role {
        Role::Student => Layout {
            heading: "Student dashboard",
            courses: "My Courses",
            assignments: "Upcoming Assignments",
            submissions: "My Submissions",
            events: "Events",
        },
        Role::Lecturer => Layout {
            heading: "Lecturer dashboard",
            courses: "Teaching",
            assignments: "Assignments",
            submissions: "Submissions to Review",
            events: "Events",
        },
        Role::Admin => Layout {
            heading: "Admin dashboard",
            courses: "All Courses",
            assignments: "All Assignments",
            submissions: "All Submissions",
            events: "Events",
        },
    }
}

/// Body of the dashboard page for `auth`'s role.
pub fn render(auth: &SessionAuth, data: &ShellData) -> String {
    let layout = layout(auth.role());
    let panels = match auth.role() {
        Role::Student => [
            data.courses.render(layout.courses),
            data.assignments.render(layout.assignments),
            data.events.render(layout.events),
            data.submissions.render(layout.submissions),
        ],
        Role::Lecturer | Role::Admin => [
            data.courses.render(layout.courses),
            data.assignments.render(layout.assignments),
            data.submissions.render(layout.submissions),
            data.events.render(layout.events),
        ],
    };

    format!(
        r#"<h1>{}</h1><p class="greeting">Welcome back, {}.</p><div class="panels">{}</div>"#,
        layout.heading,
        escape(auth.display_name()),
        panels.concat()
    )
}
