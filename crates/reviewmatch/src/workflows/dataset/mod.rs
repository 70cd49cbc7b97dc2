//! Import of the platform's relational tables from CSV exports.

mod parser;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::workflows::separation::{
    AssignmentRow, CompanyRecord, InstitutionRecord, PersonRecord, SubmissionRecord,
};

pub const INSTITUTIONS_FILE: &str = "institutions.csv";
pub const COMPANIES_FILE: &str = "companies.csv";
pub const PERSONS_FILE: &str = "persons.csv";
pub const SUBMISSIONS_FILE: &str = "submissions.csv";
pub const ASSIGNMENTS_FILE: &str = "assignments.csv";

#[derive(Debug)]
pub enum DatasetImportError {
    Io { path: PathBuf, source: io::Error },
    Csv { file: &'static str, source: csv::Error },
}

impl std::fmt::Display for DatasetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetImportError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            DatasetImportError::Csv { file, source } => {
                write!(f, "invalid CSV data in {}: {}", file, source)
            }
        }
    }
}

impl std::error::Error for DatasetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetImportError::Io { source, .. } => Some(source),
            DatasetImportError::Csv { source, .. } => Some(source),
        }
    }
}

/// Snapshot of every table the separation workflow reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDataset {
    pub institutions: Vec<InstitutionRecord>,
    pub companies: Vec<CompanyRecord>,
    pub persons: Vec<PersonRecord>,
    pub submissions: Vec<SubmissionRecord>,
    pub assignments: Vec<AssignmentRow>,
}

/// Readers for each export. Institutions and companies are optional tables.
pub struct DatasetSources<R> {
    pub institutions: Option<R>,
    pub companies: Option<R>,
    pub persons: R,
    pub submissions: R,
    pub assignments: R,
}

pub struct DatasetImporter;

impl DatasetImporter {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<ReviewDataset, DatasetImportError> {
        let dir = dir.as_ref();
        let sources = DatasetSources {
            institutions: open_optional(&dir.join(INSTITUTIONS_FILE))?,
            companies: open_optional(&dir.join(COMPANIES_FILE))?,
            persons: open_required(&dir.join(PERSONS_FILE))?,
            submissions: open_required(&dir.join(SUBMISSIONS_FILE))?,
            assignments: open_required(&dir.join(ASSIGNMENTS_FILE))?,
        };

        let dataset = Self::from_sources(sources)?;
        info!(
            dir = %dir.display(),
            persons = dataset.persons.len(),
            submissions = dataset.submissions.len(),
            assignments = dataset.assignments.len(),
            "imported review dataset"
        );
        Ok(dataset)
    }

    pub fn from_sources<R: Read>(
        sources: DatasetSources<R>,
    ) -> Result<ReviewDataset, DatasetImportError> {
        let institutions = match sources.institutions {
            Some(reader) => parser::parse_institutions(reader).map_err(csv_error(INSTITUTIONS_FILE))?,
            None => Vec::new(),
        };
        let companies = match sources.companies {
            Some(reader) => parser::parse_companies(reader).map_err(csv_error(COMPANIES_FILE))?,
            None => Vec::new(),
        };

        let persons = parser::parse_persons(sources.persons).map_err(csv_error(PERSONS_FILE))?;
        let submissions =
            parser::parse_submissions(sources.submissions).map_err(csv_error(SUBMISSIONS_FILE))?;
        let mut assignments =
            parser::parse_assignments(sources.assignments).map_err(csv_error(ASSIGNMENTS_FILE))?;

        // Assignments of a dropped submission would otherwise fail every matrix request.
        if !submissions.skipped.is_empty() {
            assignments.retain(|row| {
                let keep = !submissions.skipped.contains(&row.submission_id);
                if !keep {
                    warn!(
                        submission_id = row.submission_id.0,
                        reviewer_id = row.reviewer_person_id.0,
                        "dropping assignment of skipped submission"
                    );
                }
                keep
            });
        }

        Ok(ReviewDataset {
            institutions,
            companies,
            persons,
            submissions: submissions.records,
            assignments,
        })
    }
}

fn csv_error(file: &'static str) -> impl Fn(csv::Error) -> DatasetImportError {
    move |source| DatasetImportError::Csv { file, source }
}

fn open_required(path: &Path) -> Result<File, DatasetImportError> {
    File::open(path).map_err(|source| DatasetImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn open_optional(path: &Path) -> Result<Option<File>, DatasetImportError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DatasetImportError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
