//! Resume list edits under the single-default invariant.
//!
//! Each function takes the current list and returns the new one; callers write
//! the whole list back guarded by the owning user's version.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Resume, UserError};

/// Metadata for a resume that has just been uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResume {
    pub file_name: String,
    pub storage_key: String,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
    pub make_default: bool,
}

impl NewResume {
    pub fn new(file_name: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            storage_key: storage_key.into(),
            file_size: None,
            mime_type: None,
            make_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.make_default = true;
        self
    }

    /// Materializes the record. `is_default` is settled by [`add_resume`].
    pub fn into_resume(self, resume_id: Uuid, uploaded_at: DateTime<Utc>) -> Resume {
        Resume {
            resume_id,
            file_name: self.file_name,
            storage_key: self.storage_key,
            uploaded_at,
            is_default: self.make_default,
            file_size: self.file_size,
            mime_type: self.mime_type,
        }
    }
}

/// Object key for an uploaded resume: `resumes/<user_id>/<resume_id>/<file name>`.
///
/// Characters outside `[A-Za-z0-9._-]` in the file name become `_`.
pub fn resume_storage_key(user_id: Uuid, resume_id: Uuid, file_name: &str) -> String {
    let safe: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("resumes/{user_id}/{resume_id}/{safe}")
}

/// Appends `resume`. It becomes the default when flagged so or when no other
/// resume is the default.
pub fn add_resume(resumes: &[Resume], resume: Resume) -> Result<Vec<Resume>, UserError> {
    if resume.file_name.trim().is_empty() {
        return Err(UserError::EmptyFileName);
    }
    if resumes.iter().any(|r| r.resume_id == resume.resume_id) {
        return Err(UserError::DuplicateResume(resume.resume_id));
    }

    let make_default = resume.is_default || !resumes.iter().any(|r| r.is_default);
    let mut next: Vec<Resume> = resumes
        .iter()
        .cloned()
        .map(|mut r| {
            if make_default {
                r.is_default = false;
            }
            r
        })
        .collect();
    next.push(Resume {
        is_default: make_default,
        ..resume
    });
    Ok(next)
}

/// Removes a resume, returning the new list and the removed record.
///
/// Removing the default promotes the first remaining resume.
pub fn remove_resume(
    resumes: &[Resume],
    resume_id: Uuid,
) -> Result<(Vec<Resume>, Resume), UserError> {
    let position = resumes
        .iter()
        .position(|r| r.resume_id == resume_id)
        .ok_or(UserError::ResumeNotFound(resume_id))?;

    let mut next = resumes.to_vec();
    let removed = next.remove(position);
    if removed.is_default {
        if let Some(first) = next.first_mut() {
            first.is_default = true;
        }
    }
    Ok((next, removed))
}

/// Marks `resume_id` as the default and clears every other flag.
pub fn set_default_resume(resumes: &[Resume], resume_id: Uuid) -> Result<Vec<Resume>, UserError> {
    if !resumes.iter().any(|r| r.resume_id == resume_id) {
        return Err(UserError::ResumeNotFound(resume_id));
    }

    Ok(resumes
        .iter()
        .cloned()
        .map(|mut r| {
            r.is_default = r.resume_id == resume_id;
            r
        })
        .collect())
}
