//! Table layout description (pure data).

use std::fmt;

pub const PK_ATTRIBUTE: &str = "PK";
pub const SK_ATTRIBUTE: &str = "SK";
pub const ENTITY_TYPE_ATTRIBUTE: &str = "entityType";
pub const VERSION_ATTRIBUTE: &str = "version";

/// Global secondary indexes of the table.
///
/// - `Gsi1`: jobs by status
/// - `Gsi2`: applications by job, users by email (disjoint key prefixes)
/// - `Gsi3`: applications by applicant email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    Gsi1,
    Gsi2,
    Gsi3,
}

impl Index {
    pub const ALL: [Index; 3] = [Index::Gsi1, Index::Gsi2, Index::Gsi3];

    /// Index name as declared on the table.
    pub fn name(self) -> &'static str {
        match self {
            Index::Gsi1 => "GSI1",
            Index::Gsi2 => "GSI2",
            Index::Gsi3 => "GSI3",
        }
    }

    /// Attribute holding the index partition key.
    pub fn pk_attribute(self) -> &'static str {
        match self {
            Index::Gsi1 => "GSI1PK",
            Index::Gsi2 => "GSI2PK",
            Index::Gsi3 => "GSI3PK",
        }
    }

    /// Attribute holding the index sort key.
    pub fn sk_attribute(self) -> &'static str {
        match self {
            Index::Gsi1 => "GSI1SK",
            Index::Gsi2 => "GSI2SK",
            Index::Gsi3 => "GSI3SK",
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical layout of the table. The table name itself is configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub pk_attribute: &'static str,
    pub sk_attribute: &'static str,
    pub indexes: [Index; 3],
}

/// The layout every backend uses.
pub const TABLE_LAYOUT: TableLayout = TableLayout {
    pk_attribute: PK_ATTRIBUTE,
    sk_attribute: SK_ATTRIBUTE,
    indexes: Index::ALL,
};

/// Entity type discriminator stored on every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Job,
    Application,
    User,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Job => "JOB",
            EntityType::Application => "APPLICATION",
            EntityType::User => "USER",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityType::Job => "Job",
            EntityType::Application => "Application",
            EntityType::User => "User",
        }
    }
}
