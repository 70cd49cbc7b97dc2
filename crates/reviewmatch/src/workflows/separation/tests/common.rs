use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::separation::access::AdminAllowList;
use crate::workflows::separation::domain::{
    AffiliationBundle, CompanyId, InstitutionId, Location, PersonId, PersonRef, SubmissionId,
    SubmissionStatus,
};
use crate::workflows::separation::repository::{
    AssignmentRow, CompanyRecord, InstitutionRecord, PersonRecord, RepositoryError,
    ReviewDirectory, SubmissionRecord,
};
use crate::workflows::separation::{connection_router, AdminIdentity, ConnectionService};

pub(super) const ADMIN_EMAIL: &str = "chair@reviewmatch.org";

pub(super) fn admin() -> AdminIdentity {
    AdminIdentity::verified(ADMIN_EMAIL)
}

pub(super) fn allow_list() -> AdminAllowList {
    AdminAllowList::new([ADMIN_EMAIL])
}

pub(super) fn boston() -> Location {
    Location::new(
        Some("Boston".to_string()),
        Some("MA".to_string()),
        Some("USA".to_string()),
    )
}

pub(super) fn full_bundle() -> AffiliationBundle {
    AffiliationBundle {
        affiliation: Some("State University".to_string()),
        workplace: Some("Acme Research".to_string()),
        bachelor_institution: Some("Tech Institute".to_string()),
        master_institution: Some("Coastal College".to_string()),
        phd_institution: Some("State University".to_string()),
        advisor: Some("Ada Lovelace".to_string()),
        research_group: Some("Systems Lab".to_string()),
        location: boston(),
    }
}

pub(super) fn person(id: i64, first_name: &str, last_name: &str, email: &str) -> PersonRecord {
    PersonRecord {
        id: PersonId(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        city: None,
        state: None,
        country: None,
        affiliation_id: None,
        workplace_id: None,
        bachelor_institution_id: None,
        master_institution_id: None,
        phd_institution_id: None,
        advisor_id: None,
        research_group_name: None,
    }
}

pub(super) fn submission(id: i64, title: &str, author_name: &str) -> SubmissionRecord {
    SubmissionRecord {
        id: SubmissionId(id),
        title: title.to_string(),
        author_name: author_name.to_string(),
        author_affiliation_id: None,
        author_workplace_id: None,
        author_bachelor_institution_id: None,
        author_master_institution_id: None,
        author_phd_institution_id: None,
        author_advisor_name: None,
        author_research_group: None,
        author_city: None,
        author_state: None,
        author_country: None,
        status: SubmissionStatus::InReview,
    }
}

pub(super) fn assignment(submission_id: i64, reviewer_id: i64, status: &str) -> AssignmentRow {
    AssignmentRow {
        submission_id: SubmissionId(submission_id),
        reviewer_person_id: PersonId(reviewer_id),
        status: status.to_string(),
        assigned_on: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    institutions: HashMap<InstitutionId, InstitutionRecord>,
    companies: HashMap<CompanyId, CompanyRecord>,
    persons: Vec<PersonRecord>,
    submissions: HashMap<SubmissionId, SubmissionRecord>,
    assignments: Vec<AssignmentRow>,
}

impl MemoryDirectory {
    pub(super) fn with_institution(mut self, id: i64, name: &str) -> Self {
        self.institutions.insert(
            InstitutionId(id),
            InstitutionRecord {
                id: InstitutionId(id),
                name: name.to_string(),
                city: None,
                country: None,
            },
        );
        self
    }

    pub(super) fn with_company(mut self, id: i64, name: &str) -> Self {
        self.companies.insert(
            CompanyId(id),
            CompanyRecord {
                id: CompanyId(id),
                name: name.to_string(),
                city: None,
                state: None,
                country: None,
            },
        );
        self
    }

    pub(super) fn with_person(mut self, record: PersonRecord) -> Self {
        self.persons.push(record);
        self
    }

    pub(super) fn with_submission(mut self, record: SubmissionRecord) -> Self {
        self.submissions.insert(record.id, record);
        self
    }

    pub(super) fn with_assignment(mut self, row: AssignmentRow) -> Self {
        self.assignments.push(row);
        self
    }
}

impl ReviewDirectory for MemoryDirectory {
    fn person(&self, reference: &PersonRef) -> Result<Option<PersonRecord>, RepositoryError> {
        let found = self.persons.iter().find(|person| match reference {
            PersonRef::Id(id) => person.id == *id,
            PersonRef::Email(email) => person.email.eq_ignore_ascii_case(email),
        });
        Ok(found.cloned())
    }

    fn institution(&self, id: InstitutionId) -> Result<Option<InstitutionRecord>, RepositoryError> {
        Ok(self.institutions.get(&id).cloned())
    }

    fn company(&self, id: CompanyId) -> Result<Option<CompanyRecord>, RepositoryError> {
        Ok(self.companies.get(&id).cloned())
    }

    fn submission(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Ok(self.submissions.get(&id).cloned())
    }

    fn assignments(&self) -> Result<Vec<AssignmentRow>, RepositoryError> {
        Ok(self.assignments.clone())
    }
}

pub(super) struct UnavailableDirectory;

impl ReviewDirectory for UnavailableDirectory {
    fn person(&self, _reference: &PersonRef) -> Result<Option<PersonRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn institution(&self, _id: InstitutionId) -> Result<Option<InstitutionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn company(&self, _id: CompanyId) -> Result<Option<CompanyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn submission(&self, _id: SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn assignments(&self) -> Result<Vec<AssignmentRow>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Two submissions, three reviewers, and a realistic mix of ties.
///
/// * submission 1 (Alan Author) shares affiliation, advisor, and location with Rita;
///   Omar shares nothing.
/// * submission 2 (Beth Writer) has no author details at all.
/// * submission 3 has no reviewers.
pub(super) fn review_directory() -> MemoryDirectory {
    let mut advisor = person(100, "Ada", "Lovelace", "ada@stateu.edu");
    advisor.affiliation_id = Some(InstitutionId(1));

    let mut rita = person(101, "Rita", "Reviewer", "rita@stateu.edu");
    rita.affiliation_id = Some(InstitutionId(1));
    rita.bachelor_institution_id = Some(InstitutionId(3));
    rita.advisor_id = Some(PersonId(100));
    rita.city = Some("Boston".to_string());
    rita.state = Some("MA".to_string());
    rita.country = Some("USA".to_string());

    let mut omar = person(102, "Omar", "Outsider", "omar@techinst.pt");
    omar.affiliation_id = Some(InstitutionId(2));
    omar.workplace_id = Some(CompanyId(10));
    omar.city = Some("Lisbon".to_string());
    omar.country = Some("Portugal".to_string());

    let mut alan = submission(1, "Separation Logic for Peer Review", "Alan Author");
    alan.author_affiliation_id = Some(InstitutionId(1));
    alan.author_bachelor_institution_id = Some(InstitutionId(2));
    alan.author_advisor_name = Some("  ada LOVELACE ".to_string());
    alan.author_city = Some("boston".to_string());
    alan.author_state = Some("MA".to_string());
    alan.author_country = Some("usa".to_string());

    MemoryDirectory::default()
        .with_institution(1, "State University")
        .with_institution(2, "Tech Institute")
        .with_institution(3, "Coastal College")
        .with_company(10, "Acme Research")
        .with_person(advisor)
        .with_person(rita)
        .with_person(omar)
        .with_submission(alan)
        .with_submission(submission(2, "Sparse Profiles", "Beth Writer"))
        .with_submission(submission(3, "Awaiting Reviewers", "Carl Pending"))
        .with_assignment(assignment(2, 101, "assigned"))
        .with_assignment(assignment(1, 101, "completed"))
        .with_assignment(assignment(1, 102, "in_progress"))
}

pub(super) fn service_with(
    directory: MemoryDirectory,
) -> ConnectionService<MemoryDirectory, AdminAllowList> {
    ConnectionService::new(Arc::new(directory), Arc::new(allow_list()))
}

pub(super) fn router_with(directory: MemoryDirectory) -> axum::Router {
    connection_router(Arc::new(service_with(directory)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
