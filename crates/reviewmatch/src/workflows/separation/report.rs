use std::collections::{hash_map::Entry, HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::access::AdminIdentity;
use super::comparator::ConnectionFactor;
use super::domain::{AssignmentStatus, PersonId, PersonRef, SubmissionId};
use super::lookup::{AffiliationLookup, LookupError, ResolvedSubmission};
use super::repository::{AssignmentRow, RepositoryError, ReviewDirectory};
use super::scorer::{SeparationLabel, SeparationScorer};

/// Connection view of one (submission, reviewer) assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorReviewerConnection {
    pub submission_id: SubmissionId,
    pub paper_title: String,
    pub author_name: String,
    #[serde(skip)]
    pub reviewer_id: PersonId,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub degrees_of_separation: u8,
    pub max_possible_conflicts: u8,
    pub separation_score: u8,
    pub separation_label: SeparationLabel,
    pub assignment_status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_on: Option<NaiveDate>,
    pub connection_factors: Vec<ConnectionFactor>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Builds the administrative connection matrix from current assignments.
pub struct AssignmentReporter<D> {
    directory: Arc<D>,
    scorer: SeparationScorer,
}

impl<D> Clone for AssignmentReporter<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            scorer: self.scorer,
        }
    }
}

impl<D> AssignmentReporter<D>
where
    D: ReviewDirectory + 'static,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            directory,
            scorer: SeparationScorer::new(),
        }
    }

    /// Every current assignment, ordered by submission id.
    pub fn connections(
        &self,
        admin: &AdminIdentity,
    ) -> Result<Vec<AuthorReviewerConnection>, ReportError> {
        let rows = self.directory.assignments()?;
        let connections = self.assemble(rows)?;
        debug!(
            admin = admin.email(),
            connections = connections.len(),
            "built connection matrix"
        );
        Ok(connections)
    }

    /// Assignments of a single submission. Unknown submissions are a lookup failure.
    pub fn connections_for(
        &self,
        admin: &AdminIdentity,
        submission_id: SubmissionId,
    ) -> Result<Vec<AuthorReviewerConnection>, ReportError> {
        let lookup = AffiliationLookup::new(self.directory.as_ref());
        lookup.submission(submission_id)?;

        let rows = self.directory.assignments_for(submission_id)?;
        let connections = self.assemble(rows)?;
        debug!(
            admin = admin.email(),
            submission_id = submission_id.0,
            connections = connections.len(),
            "built submission connections"
        );
        Ok(connections)
    }

    fn assemble(
        &self,
        rows: Vec<AssignmentRow>,
    ) -> Result<Vec<AuthorReviewerConnection>, ReportError> {
        let lookup = AffiliationLookup::new(self.directory.as_ref());
        let mut submissions: HashMap<SubmissionId, ResolvedSubmission> = HashMap::new();
        let mut seen: HashSet<(SubmissionId, PersonId)> = HashSet::new();
        let mut connections = Vec::with_capacity(rows.len());

        for row in rows {
            let status = match row.status.parse::<AssignmentStatus>() {
                Ok(status) => status,
                Err(err) => {
                    warn!(
                        submission_id = row.submission_id.0,
                        reviewer_id = row.reviewer_person_id.0,
                        %err,
                        "skipping malformed assignment"
                    );
                    continue;
                }
            };

            if !seen.insert((row.submission_id, row.reviewer_person_id)) {
                continue;
            }

            let submission = match submissions.entry(row.submission_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(lookup.submission(row.submission_id)?),
            };
            let reviewer = lookup.person(&PersonRef::Id(row.reviewer_person_id))?;
            let summary = self.scorer.score(&submission.author, &reviewer.bundle);

            connections.push(AuthorReviewerConnection {
                submission_id: submission.record.id,
                paper_title: submission.record.title.clone(),
                author_name: submission.record.author_name.clone(),
                reviewer_id: reviewer.record.id,
                reviewer_name: reviewer.record.display_name(),
                reviewer_email: reviewer.record.email.clone(),
                degrees_of_separation: summary.degrees_of_separation,
                max_possible_conflicts: summary.max_possible_conflicts,
                separation_score: summary.separation_score,
                separation_label: summary.label,
                assignment_status: status,
                assigned_on: row.assigned_on,
                connection_factors: summary.factors,
            });
        }

        connections.sort_by(|left, right| {
            left.submission_id
                .cmp(&right.submission_id)
                .then_with(|| left.reviewer_email.cmp(&right.reviewer_email))
                .then_with(|| left.reviewer_id.cmp(&right.reviewer_id))
        });

        Ok(connections)
    }
}
