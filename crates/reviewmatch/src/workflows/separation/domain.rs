use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a row in the persons table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

/// Identifier of a paper submitted for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub i64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How callers point at a person: by row id or by registered e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PersonRef {
    Id(PersonId),
    Email(String),
}

impl fmt::Display for PersonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonRef::Id(id) => write!(f, "#{id}"),
            PersonRef::Email(email) => write!(f, "<{email}>"),
        }
    }
}

/// Geographic location split into the parts the profile forms collect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn new(city: Option<String>, state: Option<String>, country: Option<String>) -> Self {
        Self {
            city: present(city),
            state: present(state),
            country: present(country),
        }
    }

    pub fn parts(&self) -> [Option<&str>; 3] {
        [
            self.city.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.parts()
            .iter()
            .all(|part| part.map_or(true, |value| value.trim().is_empty()))
    }

    /// Present parts joined with ", ", or `None` when nothing is known.
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .parts()
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Everything known about a person that can tie them to another person.
///
/// Every field is optional; a missing value means "no information" and never counts as
/// evidence in either direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationBundle {
    pub affiliation: Option<String>,
    pub workplace: Option<String>,
    pub bachelor_institution: Option<String>,
    pub master_institution: Option<String>,
    pub phd_institution: Option<String>,
    pub advisor: Option<String>,
    pub research_group: Option<String>,
    #[serde(default)]
    pub location: Location,
}

impl AffiliationBundle {
    /// Text value for a single-valued factor. Location has no single value and yields `None`.
    pub fn text(&self, factor: ComparisonFactor) -> Option<&str> {
        let value = match factor {
            ComparisonFactor::Affiliation => &self.affiliation,
            ComparisonFactor::Workplace => &self.workplace,
            ComparisonFactor::BachelorInstitution => &self.bachelor_institution,
            ComparisonFactor::MasterInstitution => &self.master_institution,
            ComparisonFactor::PhdInstitution => &self.phd_institution,
            ComparisonFactor::Advisor => &self.advisor,
            ComparisonFactor::ResearchGroup => &self.research_group,
            ComparisonFactor::Location => return None,
        };
        value.as_deref()
    }
}

/// Trims a value and drops it when nothing is left.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Fixed set of ties examined for every author/reviewer pair, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonFactor {
    Affiliation,
    Workplace,
    BachelorInstitution,
    MasterInstitution,
    PhdInstitution,
    Advisor,
    ResearchGroup,
    Location,
}

impl ComparisonFactor {
    pub const ALL: [ComparisonFactor; 8] = [
        ComparisonFactor::Affiliation,
        ComparisonFactor::Workplace,
        ComparisonFactor::BachelorInstitution,
        ComparisonFactor::MasterInstitution,
        ComparisonFactor::PhdInstitution,
        ComparisonFactor::Advisor,
        ComparisonFactor::ResearchGroup,
        ComparisonFactor::Location,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Affiliation => "affiliation",
            Self::Workplace => "workplace",
            Self::BachelorInstitution => "bachelor_institution",
            Self::MasterInstitution => "master_institution",
            Self::PhdInstitution => "phd_institution",
            Self::Advisor => "advisor",
            Self::ResearchGroup => "research_group",
            Self::Location => "location",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Affiliation => "Institutional Affiliation",
            Self::Workplace => "Workplace",
            Self::BachelorInstitution => "Bachelor's Institution",
            Self::MasterInstitution => "Master's Institution",
            Self::PhdInstitution => "PhD Institution",
            Self::Advisor => "Advisor",
            Self::ResearchGroup => "Research Group",
            Self::Location => "Location",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Affiliation => "building",
            Self::Workplace => "briefcase",
            Self::BachelorInstitution | Self::MasterInstitution | Self::PhdInstitution => {
                "graduation-cap"
            }
            Self::Advisor => "user",
            Self::ResearchGroup => "users",
            Self::Location => "map-pin",
        }
    }
}

impl FromStr for ComparisonFactor {
    type Err = MalformedRecord;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(raw);
        Self::ALL
            .into_iter()
            .find(|factor| factor.key() == key)
            .ok_or_else(|| MalformedRecord::FactorKey(raw.to_string()))
    }
}

/// Progress of a reviewer on an assigned submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    InProgress,
    Completed,
    Declined,
}

impl AssignmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Declined => "declined",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Declined => "Declined",
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = MalformedRecord;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_key(raw).as_str() {
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "declined" => Ok(Self::Declined),
            _ => Err(MalformedRecord::AssignmentStatus(raw.to_string())),
        }
    }
}

/// Editorial state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    InReview,
    Reviewed,
    Rejected,
    Withdrawn,
}

impl FromStr for SubmissionStatus {
    type Err = MalformedRecord;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_key(raw).as_str() {
            "pending" => Ok(Self::Pending),
            "in_review" => Ok(Self::InReview),
            "reviewed" => Ok(Self::Reviewed),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            _ => Err(MalformedRecord::SubmissionStatus(raw.to_string())),
        }
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

/// Record-level defects that cause a single row to be skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    #[error("unrecognized assignment status '{0}'")]
    AssignmentStatus(String),
    #[error("unrecognized submission status '{0}'")]
    SubmissionStatus(String),
    #[error("unrecognized comparison factor '{0}'")]
    FactorKey(String),
}
