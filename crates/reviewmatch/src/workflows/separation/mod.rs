//! Author/reviewer conflict-of-interest separation scoring.
//!
//! Affiliation lookup feeds the factor comparator, which feeds the separation scorer, which
//! feeds the assignment reporter behind the administrative connection routes.

pub mod access;
pub mod comparator;
pub mod domain;
pub mod lookup;
pub mod report;
pub mod repository;
pub mod router;
pub mod scorer;
pub mod service;

#[cfg(test)]
mod tests;

pub use access::{AccessError, AdminAllowList, AdminAuthorizer, AdminIdentity};
pub use comparator::{compare, ConnectionFactor};
pub use domain::{
    AffiliationBundle, AssignmentStatus, CompanyId, ComparisonFactor, InstitutionId, Location,
    MalformedRecord, PersonId, PersonRef, SubmissionId, SubmissionStatus,
};
pub use lookup::{AffiliationLookup, LookupError, ResolvedPerson, ResolvedSubmission};
pub use report::{AssignmentReporter, AuthorReviewerConnection, ReportError};
pub use repository::{
    AssignmentRow, CompanyRecord, InstitutionRecord, PersonRecord, RepositoryError,
    ReviewDirectory, SubmissionRecord,
};
pub use router::{connection_router, CALLER_HEADER};
pub use scorer::{
    separation_score, SeparationLabel, SeparationScorer, SeparationSummary,
    MAX_POSSIBLE_CONFLICTS,
};
pub use service::{ConnectionService, ConnectionServiceError};
