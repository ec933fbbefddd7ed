//! Task form: the title/description pair the user edits.
//!
//! The form is the only place where raw user input is turned into
//! [`NewTask`] or [`TaskPatch`], so the store never sees a blank title.

use taskboard_proto::task::{NewTask, Task, TaskPatch, ValidationError};

/// Raw field values of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Title as typed.
    pub title: String,
    /// Description as typed; empty means none.
    pub description: String,
}

impl TaskForm {
    /// A form with the given title and no description.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// A form prefilled from an existing task, for editing.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
        }
    }

    /// Validates the form as a new task.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is blank or a field is too
    /// long.
    pub fn to_new_task(&self) -> Result<NewTask, ValidationError> {
        NewTask::new(&self.title, self.description_opt())
    }

    /// Validates the form as an edit of `original`, keeping only the fields
    /// that differ from it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is blank or a field is too
    /// long.
    pub fn to_patch(&self, original: &Task) -> Result<TaskPatch, ValidationError> {
        let full = self.to_full_patch()?;
        let mut patch = TaskPatch::new();
        if let Some(title) = full.title()
            && title != original.title
        {
            patch = patch.with_title(title)?;
        }
        let description = self.description_opt().filter(|d| !d.trim().is_empty());
        if description.as_deref() != original.description.as_deref() {
            patch = patch.with_description(description)?;
        }
        Ok(patch)
    }

    /// Validates the form as an edit that sends both fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is blank or a field is too
    /// long.
    pub fn to_full_patch(&self) -> Result<TaskPatch, ValidationError> {
        TaskPatch::new()
            .with_title(&self.title)?
            .with_description(self.description_opt())
    }

    fn description_opt(&self) -> Option<String> {
        (!self.description.is_empty()).then(|| self.description.clone())
    }
}
