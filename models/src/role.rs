use serde::{Deserialize, Serialize};

use crate::resource::ResourceKind;

/// Role claim carried by a session. Each role owns exactly one dashboard
/// area, so there is no ordering between roles.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Role {
    Student,
    Lecturer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Lecturer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Lecturer => "lecturer",
            Self::Admin => "admin",
        }
    }

    /// Path prefix of the area this role may enter, e.g. `/lecturer`.
    pub fn area(&self) -> &'static str {
        match self {
            Self::Student => "/student",
            Self::Lecturer => "/lecturer",
            Self::Admin => "/admin",
        }
    }

    /// The role a request path requires, if the path lies inside a role area.
    /// Only whole segments match: `/students` is not part of `/student`.
    pub fn required_for_path(path: &str) -> Option<Role> {
        Self::ALL.into_iter().find(|role| {
            path.strip_prefix(role.area())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Whether this role may create, update or delete records of `kind`.
    pub fn can_manage(&self, kind: ResourceKind) -> bool {
        match self {
            Self::Admin => true,
            Self::Lecturer => matches!(
                kind,
                ResourceKind::Lessons
                    | ResourceKind::Assignments
                    | ResourceKind::Quizzes
                    | ResourceKind::Exams
                    | ResourceKind::Events
            ),
            Self::Student => kind == ResourceKind::Submissions,
        }
    }
}

impl From<Role> for &'static str {
    fn from(value: Role) -> Self {
        value.as_str()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = String;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "lecturer" => Ok(Self::Lecturer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("No such role exists: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::try_from(value.as_str())
    }
}
