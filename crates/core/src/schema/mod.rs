//! Single-table schema: key builders, index layout and slug derivation.

mod keys;
mod slug;
mod table;

pub use keys::{
    application_by_applicant_index_key, application_by_job_index_key, application_index_sk_prefix,
    application_key, applications_by_applicant_partition, applications_by_job_partition, job_key,
    job_status_index_key, job_status_index_sk_prefix, job_status_partition, sortable_timestamp,
    user_by_email_index_key, user_email_partition, user_index_sk_prefix, user_key, IndexKey,
    PrimaryKey,
};
pub use slug::{generate_job_id, slugify};
pub use table::{
    EntityType, Index, TableLayout, ENTITY_TYPE_ATTRIBUTE, PK_ATTRIBUTE, SK_ATTRIBUTE, TABLE_LAYOUT,
    VERSION_ATTRIBUTE,
};
