use super::domain::{
    present, AffiliationBundle, CompanyId, InstitutionId, Location, PersonId, PersonRef,
    SubmissionId,
};
use super::repository::{PersonRecord, RepositoryError, ReviewDirectory, SubmissionRecord};

/// Lookup failures. A missing record is never reported as an empty bundle.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("person {0} not found")]
    PersonNotFound(PersonRef),
    #[error("submission {0} not found")]
    SubmissionNotFound(SubmissionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Reviewer profile together with its resolved affiliation bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPerson {
    pub record: PersonRecord,
    pub bundle: AffiliationBundle,
}

/// Submission together with the author's resolved affiliation bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSubmission {
    pub record: SubmissionRecord,
    pub author: AffiliationBundle,
}

/// Resolves institution, company, and advisor references into comparable names.
pub struct AffiliationLookup<'a, D: ?Sized> {
    directory: &'a D,
}

impl<'a, D> AffiliationLookup<'a, D>
where
    D: ReviewDirectory + ?Sized,
{
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    pub fn person(&self, reference: &PersonRef) -> Result<ResolvedPerson, LookupError> {
        let record = self
            .directory
            .person(reference)?
            .ok_or_else(|| LookupError::PersonNotFound(reference.clone()))?;
        let bundle = self.bundle_for_person(&record)?;
        Ok(ResolvedPerson { record, bundle })
    }

    pub fn submission(&self, id: SubmissionId) -> Result<ResolvedSubmission, LookupError> {
        let record = self
            .directory
            .submission(id)?
            .ok_or(LookupError::SubmissionNotFound(id))?;
        let author = self.bundle_for_author(&record)?;
        Ok(ResolvedSubmission { record, author })
    }

    pub fn bundle_for_person(&self, record: &PersonRecord) -> Result<AffiliationBundle, LookupError> {
        Ok(AffiliationBundle {
            affiliation: self.institution_name(record.affiliation_id)?,
            workplace: self.company_name(record.workplace_id)?,
            bachelor_institution: self.institution_name(record.bachelor_institution_id)?,
            master_institution: self.institution_name(record.master_institution_id)?,
            phd_institution: self.institution_name(record.phd_institution_id)?,
            advisor: self.advisor_name(record.advisor_id)?,
            research_group: present(record.research_group_name.clone()),
            location: Location::new(
                record.city.clone(),
                record.state.clone(),
                record.country.clone(),
            ),
        })
    }

    pub fn bundle_for_author(
        &self,
        submission: &SubmissionRecord,
    ) -> Result<AffiliationBundle, LookupError> {
        Ok(AffiliationBundle {
            affiliation: self.institution_name(submission.author_affiliation_id)?,
            workplace: self.company_name(submission.author_workplace_id)?,
            bachelor_institution: self
                .institution_name(submission.author_bachelor_institution_id)?,
            master_institution: self.institution_name(submission.author_master_institution_id)?,
            phd_institution: self.institution_name(submission.author_phd_institution_id)?,
            advisor: present(submission.author_advisor_name.clone()),
            research_group: present(submission.author_research_group.clone()),
            location: Location::new(
                submission.author_city.clone(),
                submission.author_state.clone(),
                submission.author_country.clone(),
            ),
        })
    }

    // Dangling references resolve to "unknown"; the referenced rows are optional data.
    fn institution_name(&self, id: Option<InstitutionId>) -> Result<Option<String>, LookupError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let name = self.directory.institution(id)?.map(|record| record.name);
        Ok(present(name))
    }

    fn company_name(&self, id: Option<CompanyId>) -> Result<Option<String>, LookupError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let name = self.directory.company(id)?.map(|record| record.name);
        Ok(present(name))
    }

    fn advisor_name(&self, id: Option<PersonId>) -> Result<Option<String>, LookupError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let name = self
            .directory
            .person(&PersonRef::Id(id))?
            .map(|advisor| advisor.display_name());
        Ok(present(name))
    }
}
