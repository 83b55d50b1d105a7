use rand::{distr::Alphanumeric, Rng};

/// Length of the random suffix appended to generated job IDs.
const JOB_ID_SUFFIX_LEN: usize = 8;

/// Derives a URL slug from a title.
///
/// Lowercases, drops anything that is not ASCII alphanumeric, whitespace or a
/// hyphen, collapses whitespace/hyphen runs into a single `-` and trims
/// leading/trailing hyphens. Slugifying a slug returns it unchanged.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    slug
}

/// Generates a job ID of the form `<category-slug>-<random suffix>`.
///
/// Falls back to `job` when the category has no usable characters.
pub fn generate_job_id(category: &str) -> String {
    let prefix = match slugify(category) {
        s if s.is_empty() => "job".to_string(),
        s => s,
    };

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(JOB_ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    format!("{prefix}-{suffix}")
}
