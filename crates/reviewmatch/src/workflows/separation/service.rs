use std::sync::Arc;

use super::access::{AccessError, AdminAuthorizer};
use super::domain::SubmissionId;
use super::report::{AssignmentReporter, AuthorReviewerConnection, ReportError};
use super::repository::ReviewDirectory;

/// Service composing the authorization check with the assignment reporter.
pub struct ConnectionService<D, Z> {
    reporter: AssignmentReporter<D>,
    authorizer: Arc<Z>,
}

impl<D, Z> ConnectionService<D, Z>
where
    D: ReviewDirectory + 'static,
    Z: AdminAuthorizer + 'static,
{
    pub fn new(directory: Arc<D>, authorizer: Arc<Z>) -> Self {
        Self {
            reporter: AssignmentReporter::new(directory),
            authorizer,
        }
    }

    /// Connection matrix for every current assignment.
    pub fn list(
        &self,
        credential: Option<&str>,
    ) -> Result<Vec<AuthorReviewerConnection>, ConnectionServiceError> {
        let admin = self.authorizer.authorize(credential)?;
        Ok(self.reporter.connections(&admin)?)
    }

    /// Connection matrix restricted to one submission.
    pub fn for_submission(
        &self,
        credential: Option<&str>,
        submission_id: SubmissionId,
    ) -> Result<Vec<AuthorReviewerConnection>, ConnectionServiceError> {
        let admin = self.authorizer.authorize(credential)?;
        Ok(self.reporter.connections_for(&admin, submission_id)?)
    }

    /// Same as [`Self::for_submission`] for an id taken from a request path. The caller is
    /// authorized before the id is parsed.
    pub fn for_submission_key(
        &self,
        credential: Option<&str>,
        raw_id: &str,
    ) -> Result<Vec<AuthorReviewerConnection>, ConnectionServiceError> {
        let admin = self.authorizer.authorize(credential)?;
        let submission_id = raw_id
            .trim()
            .parse::<i64>()
            .map(SubmissionId)
            .map_err(|_| ConnectionServiceError::InvalidSubmissionId(raw_id.to_string()))?;
        Ok(self.reporter.connections_for(&admin, submission_id)?)
    }
}

/// Error raised by the connection service.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("submission id '{0}' is not a number")]
    InvalidSubmissionId(String),
}
