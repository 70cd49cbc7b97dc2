use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    CompanyId, InstitutionId, PersonId, PersonRef, SubmissionId, SubmissionStatus,
};

/// Degree-granting or employing academic institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRecord {
    pub id: InstitutionId,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Non-academic employer referenced as a workplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Profile row for a registered person (reviewers, and authors who hold an account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub affiliation_id: Option<InstitutionId>,
    pub workplace_id: Option<CompanyId>,
    pub bachelor_institution_id: Option<InstitutionId>,
    pub master_institution_id: Option<InstitutionId>,
    pub phd_institution_id: Option<InstitutionId>,
    pub advisor_id: Option<PersonId>,
    pub research_group_name: Option<String>,
}

impl PersonRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Paper submission carrying the author details captured on the submission form.
///
/// Authors are not required to have a person profile, so the advisor is a free-text name
/// rather than a person reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub title: String,
    pub author_name: String,
    pub author_affiliation_id: Option<InstitutionId>,
    pub author_workplace_id: Option<CompanyId>,
    pub author_bachelor_institution_id: Option<InstitutionId>,
    pub author_master_institution_id: Option<InstitutionId>,
    pub author_phd_institution_id: Option<InstitutionId>,
    pub author_advisor_name: Option<String>,
    pub author_research_group: Option<String>,
    pub author_city: Option<String>,
    pub author_state: Option<String>,
    pub author_country: Option<String>,
    pub status: SubmissionStatus,
}

/// Reviewer assignment as stored. The status stays raw until the reporter validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub submission_id: SubmissionId,
    pub reviewer_person_id: PersonId,
    pub status: String,
    pub assigned_on: Option<NaiveDate>,
}

/// Read-only view over the platform's relational store.
pub trait ReviewDirectory: Send + Sync {
    fn person(&self, reference: &PersonRef) -> Result<Option<PersonRecord>, RepositoryError>;
    fn institution(&self, id: InstitutionId) -> Result<Option<InstitutionRecord>, RepositoryError>;
    fn company(&self, id: CompanyId) -> Result<Option<CompanyRecord>, RepositoryError>;
    fn submission(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn assignments(&self) -> Result<Vec<AssignmentRow>, RepositoryError>;

    fn assignments_for(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Vec<AssignmentRow>, RepositoryError> {
        Ok(self
            .assignments()?
            .into_iter()
            .filter(|row| row.submission_id == submission_id)
            .collect())
    }
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
