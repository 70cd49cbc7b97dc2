use metrics_exporter_prometheus::PrometheusHandle;
use reviewmatch::workflows::dataset::ReviewDataset;
use reviewmatch::workflows::separation::{
    AssignmentRow, CompanyId, CompanyRecord, InstitutionId, InstitutionRecord, PersonId,
    PersonRecord, PersonRef, RepositoryError, ReviewDirectory, SubmissionId, SubmissionRecord,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Directory hydrated once from a dataset export and read concurrently afterwards.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewDirectory {
    tables: Arc<DirectoryTables>,
}

#[derive(Default)]
struct DirectoryTables {
    institutions: HashMap<InstitutionId, InstitutionRecord>,
    companies: HashMap<CompanyId, CompanyRecord>,
    persons: HashMap<PersonId, PersonRecord>,
    emails: HashMap<String, PersonId>,
    submissions: HashMap<SubmissionId, SubmissionRecord>,
    assignments: Vec<AssignmentRow>,
}

impl InMemoryReviewDirectory {
    pub(crate) fn from_dataset(dataset: ReviewDataset) -> Self {
        let ReviewDataset {
            institutions,
            companies,
            persons,
            submissions,
            assignments,
        } = dataset;

        let emails = persons
            .iter()
            .map(|person| (person.email.trim().to_ascii_lowercase(), person.id))
            .collect();

        let tables = DirectoryTables {
            institutions: institutions
                .into_iter()
                .map(|record| (record.id, record))
                .collect(),
            companies: companies
                .into_iter()
                .map(|record| (record.id, record))
                .collect(),
            persons: persons
                .into_iter()
                .map(|record| (record.id, record))
                .collect(),
            emails,
            submissions: submissions
                .into_iter()
                .map(|record| (record.id, record))
                .collect(),
            assignments,
        };

        Self {
            tables: Arc::new(tables),
        }
    }

    pub(crate) fn assignment_count(&self) -> usize {
        self.tables.assignments.len()
    }
}

impl ReviewDirectory for InMemoryReviewDirectory {
    fn person(&self, reference: &PersonRef) -> Result<Option<PersonRecord>, RepositoryError> {
        let id = match reference {
            PersonRef::Id(id) => Some(*id),
            PersonRef::Email(email) => self
                .tables
                .emails
                .get(&email.trim().to_ascii_lowercase())
                .copied(),
        };
        Ok(id.and_then(|id| self.tables.persons.get(&id).cloned()))
    }

    fn institution(&self, id: InstitutionId) -> Result<Option<InstitutionRecord>, RepositoryError> {
        Ok(self.tables.institutions.get(&id).cloned())
    }

    fn company(&self, id: CompanyId) -> Result<Option<CompanyRecord>, RepositoryError> {
        Ok(self.tables.companies.get(&id).cloned())
    }

    fn submission(&self, id: SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Ok(self.tables.submissions.get(&id).cloned())
    }

    fn assignments(&self) -> Result<Vec<AssignmentRow>, RepositoryError> {
        Ok(self.tables.assignments.clone())
    }
}
