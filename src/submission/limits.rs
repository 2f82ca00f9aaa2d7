use super::{Attachment, SubmissionForm};

pub const MAX_FILES: usize = 3;
pub const MAX_FILE_BYTES: usize = 3 * 1024 * 1024;

/// File types the form offers in its picker. Advisory only, never enforced.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".doc", ".docx", ".pdf", ".jpg", ".jpeg", ".png"];

/// Bounds shared by the form and the submit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_files: usize,
    pub max_file_bytes: usize,
    pub max_nickname_chars: usize,
    pub max_contact_chars: usize,
    pub max_idea_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_file_bytes: MAX_FILE_BYTES,
            max_nickname_chars: 100,
            max_contact_chars: 100,
            max_idea_chars: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TooManyFiles { max: usize },
    FileTooLarge { name: String, max_bytes: usize },
    MissingField(&'static str),
    FieldTooLong { field: &'static str, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::TooManyFiles { max } => write!(f, "Max {max} files allowed"),
            ValidationError::FileTooLarge { name, max_bytes } => {
                write!(f, "File {name} exceeds {}MB", max_bytes / (1024 * 1024))
            }
            ValidationError::MissingField(field) => write!(f, "{field} is required"),
            ValidationError::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl Limits {
    /// Check a batch of newly selected files against what is already attached.
    /// The whole batch is rejected on the first violation.
    pub fn check_files(&self, already_attached: usize, incoming: &[Attachment]) -> Result<(), ValidationError> {
        if already_attached + incoming.len() > self.max_files {
            return Err(ValidationError::TooManyFiles { max: self.max_files });
        }

        if let Some(file) = incoming.iter().find(|f| f.size() > self.max_file_bytes) {
            return Err(ValidationError::FileTooLarge {
                name: file.name.clone(),
                max_bytes: self.max_file_bytes,
            });
        }

        Ok(())
    }

    pub fn check_fields(&self, form: &SubmissionForm) -> Result<(), ValidationError> {
        check_text("nickname", &form.nickname, self.max_nickname_chars)?;
        check_text("contact", &form.contact, self.max_contact_chars)?;
        check_text("idea", &form.idea, self.max_idea_chars)?;
        Ok(())
    }

    pub fn check(&self, form: &SubmissionForm) -> Result<(), ValidationError> {
        self.check_fields(form)?;
        self.check_files(0, &form.files)
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    // Counted in characters, not bytes.
    if value.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(())
}
