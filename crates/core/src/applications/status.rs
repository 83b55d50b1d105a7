use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;

use super::ApplicationError;

/// Progress of an application through the hiring pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    #[serde(alias = "reviewed")]
    Screening,
    Interview,
    Offer,
    Rejected,
    #[serde(alias = "accepted")]
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Screening => "screening",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "screening" | "reviewed" => Ok(ApplicationStatus::Screening),
            "interview" => Ok(ApplicationStatus::Interview),
            "offer" => Ok(ApplicationStatus::Offer),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" | "accepted" => Ok(ApplicationStatus::Hired),
            _ => Err(ApplicationError::InvalidStatus(s.to_string())),
        }
    }
}

impl Lifecycle for ApplicationStatus {
    const ENTITY: &'static str = "Application";

    fn successors(self) -> &'static [Self] {
        use ApplicationStatus::*;

        match self {
            Pending => &[Screening, Rejected],
            Screening => &[Interview, Rejected],
            Interview => &[Offer, Rejected],
            Offer => &[Hired, Rejected],
            Rejected | Hired => &[],
        }
    }
}
