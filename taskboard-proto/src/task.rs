//! Task model and wire format for the remote task service.
//!
//! The service speaks JSON with Portuguese field names (`titulo`,
//! `descricao`, `data_criacao`, `data_atualizacao`) and fixed status
//! literals (`pendente`, `concluida`). [`TaskRecord`] mirrors that shape
//! exactly; [`Task`] is the validated client-side model built from it via
//! [`TryFrom`], which is where the completion-timestamp invariant is
//! enforced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum allowed task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Opaque task identifier, assigned by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw identifier received from the service.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Completion status of a task.
///
/// Serialized with the service's literals: `pendente` and `concluida`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task is still to be done.
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    /// Task has been completed.
    #[serde(rename = "concluida")]
    Completed,
}

impl TaskStatus {
    /// Returns the opposite status (`Pending` <-> `Completed`).
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    /// Returns the literal used on the wire.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Completed => "concluida",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Errors produced when validating task input or service records.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace-only.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Title exceeds [`MAX_TITLE_LENGTH`] characters.
    #[error("task title too long ({len} characters, max {max})", max = MAX_TITLE_LENGTH)]
    TitleTooLong {
        /// Actual length in characters.
        len: usize,
    },
    /// Description exceeds [`MAX_DESCRIPTION_LENGTH`] characters.
    #[error("task description too long ({len} characters, max {max})", max = MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong {
        /// Actual length in characters.
        len: usize,
    },
    /// A completed record arrived without its completion timestamp.
    #[error("task {0} is completed but has no completion time")]
    MissingCompletionTime(TaskId),
}

/// Validates a title, returning it trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::TitleEmpty`] for empty or whitespace-only
/// input, or [`ValidationError::TitleTooLong`] past [`MAX_TITLE_LENGTH`].
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TitleEmpty);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong { len });
    }
    Ok(trimmed.to_string())
}

/// Validates an optional description. Blank descriptions become `None`.
///
/// # Errors
///
/// Returns [`ValidationError::DescriptionTooLong`] past
/// [`MAX_DESCRIPTION_LENGTH`] characters.
pub fn validate_description(
    description: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let Some(text) = description else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    let len = text.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong { len });
    }
    Ok(Some(text))
}

/// Timestamp parsing for service records.
///
/// Accepts RFC 3339 and, for services that store naive datetimes, an ISO
/// datetime without offset, read as UTC.
mod wire_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de};

    fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc))
            .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub(super) fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(de::Error::custom))
            .transpose()
    }
}

/// A task as represented on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Service-assigned identifier.
    pub id: TaskId,
    /// Task title.
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    /// Optional free-text description.
    #[serde(rename = "descricao", alias = "description", default)]
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Creation time, set by the service.
    #[serde(rename = "data_criacao", deserialize_with = "wire_time::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Completion time. Present when the task is completed.
    #[serde(
        rename = "data_atualizacao",
        default,
        deserialize_with = "wire_time::deserialize_option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Title of the new task.
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    /// Optional description.
    #[serde(
        rename = "descricao",
        alias = "description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Body of `PUT tasks/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title.
    #[serde(
        rename = "titulo",
        alias = "title",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// New description; an empty string or an explicit `null` clears it.
    #[serde(
        rename = "descricao",
        alias = "description",
        default,
        deserialize_with = "null_clears",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// A present field is always `Some`; `null` becomes the empty string.
fn null_clears<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|text| Some(text.unwrap_or_default()))
}

/// A validated client-side task.
///
/// Built from a [`TaskRecord`] through [`TryFrom`]. `completed_at` is
/// `Some` exactly when `status` is [`TaskStatus::Completed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Service-assigned identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Completion time, only for completed tasks.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Returns `true` if the task is completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        if record.title.trim().is_empty() {
            return Err(ValidationError::TitleEmpty);
        }
        let completed_at = match record.status {
            TaskStatus::Completed => Some(
                record
                    .updated_at
                    .ok_or(ValidationError::MissingCompletionTime(record.id))?,
            ),
            TaskStatus::Pending => None,
        };
        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description.filter(|d| !d.is_empty()),
            status: record.status,
            created_at: record.created_at,
            completed_at,
        })
    }
}

/// Input for creating a task. Construction enforces a non-blank title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: Option<String>,
}

impl NewTask {
    /// Validates and builds a creation input.
    ///
    /// The title is trimmed; a blank description is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is blank or either field
    /// exceeds its length limit.
    pub fn new(title: &str, description: Option<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title)?,
            description: validate_description(description)?,
        })
    }

    /// The validated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The validated description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Builds the `POST tasks` body.
    #[must_use]
    pub fn to_request(&self) -> CreateTaskRequest {
        CreateTaskRequest {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// A partial update. Unset fields are left unchanged by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
}

impl TaskPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is blank or too long.
    pub fn with_title(mut self, title: &str) -> Result<Self, ValidationError> {
        self.title = Some(validate_title(title)?);
        Ok(self)
    }

    /// Sets or clears the description.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DescriptionTooLong`] if the text is too long.
    pub fn with_description(mut self, description: Option<String>) -> Result<Self, ValidationError> {
        self.description = Some(validate_description(description)?.unwrap_or_default());
        Ok(self)
    }

    /// Sets a new status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The new title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The new description, if set. An empty string means "clear".
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The new status, if set.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Builds the `PUT tasks/{id}` body.
    #[must_use]
    pub fn to_request(&self) -> UpdateTaskRequest {
        UpdateTaskRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}
