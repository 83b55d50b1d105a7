use chrono::{DateTime, Utc};

use crate::lifecycle::Lifecycle;
use crate::schema::{generate_job_id, slugify};

use super::{CreateJobRequest, Job, JobError, JobStatus, UpdateJobRequest};

/// Version assigned to a freshly created job.
pub const INITIAL_VERSION: u64 = 1;

const MAX_TITLE_LEN: usize = 200;

/// Validates a job before it is written.
pub fn validate_job(job: &Job) -> Result<(), JobError> {
    if job.title.trim().is_empty() {
        return Err(JobError::EmptyTitle);
    }
    if job.title.chars().count() > MAX_TITLE_LEN {
        return Err(JobError::TitleTooLong);
    }
    if job.slug.is_empty() {
        return Err(JobError::EmptySlug);
    }
    if job.job_id.trim().is_empty() {
        return Err(JobError::MissingField("jobId"));
    }

    let required = [
        ("company", &job.company),
        ("category", &job.category),
        ("location", &job.location),
        ("employmentType", &job.employment_type),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(JobError::MissingField(*field));
    }

    if let Some(expiry) = job.expiry_date {
        if expiry < job.posted_date {
            return Err(JobError::InvalidExpiry);
        }
    }

    Ok(())
}

/// Builds a new job from a create request.
///
/// Assigns the identity (generated from the category when not supplied), the
/// slug, timestamps and the initial version.
pub fn new_job(request: CreateJobRequest, now: DateTime<Utc>) -> Result<Job, JobError> {
    let status = request.status.unwrap_or(JobStatus::Draft);
    if !matches!(status, JobStatus::Draft | JobStatus::Active) {
        return Err(JobError::InvalidStatus(status.to_string()));
    }

    let job_id = request
        .job_id
        .unwrap_or_else(|| generate_job_id(&request.category));

    let job = Job {
        job_id,
        slug: slugify(&request.title),
        title: request.title.trim().to_string(),
        company: request.company.trim().to_string(),
        category: request.category.trim().to_string(),
        location: request.location.trim().to_string(),
        employment_type: request.employment_type.trim().to_string(),
        description: request.description,
        description_html: request.description_html,
        requirements: request.requirements.unwrap_or_default(),
        qualifications: request.qualifications.unwrap_or_default(),
        preferred_skills: request.preferred_skills.unwrap_or_default(),
        skills: request.skills.unwrap_or_default(),
        experience_level: request.experience_level,
        benefits: request.benefits.unwrap_or_default(),
        salary: request.salary,
        priority: request.priority.unwrap_or_default(),
        featured: request.featured,
        status,
        external_apply_url: request.external_apply_url,
        posted_date: request.posted_date.unwrap_or_else(|| now.date_naive()),
        expiry_date: request.expiry_date,
        created_at: now,
        updated_at: now,
        version: INITIAL_VERSION,
    };

    validate_job(&job)?;
    Ok(job)
}

/// Merges an update into a stored job.
///
/// Only supplied fields change; clearable fields supplied as `Some(None)` are
/// removed. A new title re-derives the slug, a new status goes through the job
/// state machine, and the version moves up by one.
pub fn apply_job_update(
    current: &Job,
    update: UpdateJobRequest,
    now: DateTime<Utc>,
) -> Result<Job, JobError> {
    let mut job = current.clone();

    if let Some(status) = update.status {
        job.status = current.status.transition_to(status)?;
    }
    if let Some(title) = update.title {
        job.title = title.trim().to_string();
        job.slug = slugify(&job.title);
    }
    if let Some(company) = update.company {
        job.company = company;
    }
    if let Some(category) = update.category {
        job.category = category;
    }
    if let Some(location) = update.location {
        job.location = location;
    }
    if let Some(employment_type) = update.employment_type {
        job.employment_type = employment_type;
    }
    if let Some(description) = update.description {
        job.description = description;
    }
    if let Some(html) = update.description_html {
        job.description_html = html;
    }
    if let Some(requirements) = update.requirements {
        job.requirements = requirements;
    }
    if let Some(qualifications) = update.qualifications {
        job.qualifications = qualifications;
    }
    if let Some(preferred_skills) = update.preferred_skills {
        job.preferred_skills = preferred_skills;
    }
    if let Some(skills) = update.skills {
        job.skills = skills;
    }
    if let Some(level) = update.experience_level {
        job.experience_level = Some(level);
    }
    if let Some(benefits) = update.benefits {
        job.benefits = benefits;
    }
    if let Some(salary) = update.salary {
        job.salary = salary;
    }
    if let Some(priority) = update.priority {
        job.priority = priority;
    }
    if let Some(featured) = update.featured {
        job.featured = featured;
    }
    if let Some(url) = update.external_apply_url {
        job.external_apply_url = url;
    }
    if let Some(posted_date) = update.posted_date {
        job.posted_date = posted_date;
    }
    if let Some(expiry_date) = update.expiry_date {
        job.expiry_date = expiry_date;
    }

    validate_job(&job)?;

    job.version = current.version + 1;
    job.updated_at = now;
    Ok(job)
}
