use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;
use tracing::warn;

use crate::workflows::separation::{
    AssignmentRow, CompanyId, CompanyRecord, InstitutionId, InstitutionRecord, PersonId,
    PersonRecord, SubmissionId, SubmissionRecord, SubmissionStatus,
};

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

pub(crate) fn parse_institutions<R: Read>(source: R) -> Result<Vec<InstitutionRecord>, csv::Error> {
    let mut records = Vec::new();
    for row in reader(source).deserialize::<InstitutionRow>() {
        let row = row?;
        records.push(InstitutionRecord {
            id: InstitutionId(row.institution_id),
            name: row.name,
            city: row.city,
            country: row.country,
        });
    }
    Ok(records)
}

pub(crate) fn parse_companies<R: Read>(source: R) -> Result<Vec<CompanyRecord>, csv::Error> {
    let mut records = Vec::new();
    for row in reader(source).deserialize::<CompanyRow>() {
        let row = row?;
        records.push(CompanyRecord {
            id: CompanyId(row.company_id),
            name: row.company_name,
            city: row.city,
            state: row.state,
            country: row.country,
        });
    }
    Ok(records)
}

pub(crate) fn parse_persons<R: Read>(source: R) -> Result<Vec<PersonRecord>, csv::Error> {
    let mut records = Vec::new();
    for row in reader(source).deserialize::<PersonRow>() {
        let row = row?;
        records.push(PersonRecord {
            id: PersonId(row.person_id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            city: row.city,
            state: row.state,
            country: row.country,
            affiliation_id: row.affiliation_id.map(InstitutionId),
            workplace_id: row.workplace_id.map(CompanyId),
            bachelor_institution_id: row.bachelor_institution_id.map(InstitutionId),
            master_institution_id: row.master_institution_id.map(InstitutionId),
            phd_institution_id: row.phd_institution_id.map(InstitutionId),
            advisor_id: row.advisor_id.map(PersonId),
            research_group_name: row.research_group_name,
        });
    }
    Ok(records)
}

pub(crate) struct ParsedSubmissions {
    pub(crate) records: Vec<SubmissionRecord>,
    pub(crate) skipped: HashSet<SubmissionId>,
}

/// Rows with an unrecognized status are logged and dropped; their ids are kept in `skipped`.
pub(crate) fn parse_submissions<R: Read>(source: R) -> Result<ParsedSubmissions, csv::Error> {
    let mut records = Vec::new();
    let mut skipped = HashSet::new();
    for row in reader(source).deserialize::<SubmissionRow>() {
        let row = row?;
        let status = match row.status.as_deref() {
            None => SubmissionStatus::default(),
            Some(raw) => match raw.parse::<SubmissionStatus>() {
                Ok(status) => status,
                Err(err) => {
                    warn!(submission_id = row.submission_id, %err, "skipping malformed submission");
                    skipped.insert(SubmissionId(row.submission_id));
                    continue;
                }
            },
        };

        records.push(SubmissionRecord {
            id: SubmissionId(row.submission_id),
            title: row.title,
            author_name: row.author_name,
            author_affiliation_id: row.author_affiliation_id.map(InstitutionId),
            author_workplace_id: row.author_workplace_id.map(CompanyId),
            author_bachelor_institution_id: row.author_bachelor_institution_id.map(InstitutionId),
            author_master_institution_id: row.author_master_institution_id.map(InstitutionId),
            author_phd_institution_id: row.author_phd_institution_id.map(InstitutionId),
            author_advisor_name: row.author_advisor_name,
            author_research_group: row.author_research_group,
            author_city: row.author_city,
            author_state: row.author_state,
            author_country: row.author_country,
            status,
        });
    }
    Ok(ParsedSubmissions { records, skipped })
}

/// Statuses are kept raw; the reporter is the boundary that validates them.
pub(crate) fn parse_assignments<R: Read>(source: R) -> Result<Vec<AssignmentRow>, csv::Error> {
    let mut records = Vec::new();
    for row in reader(source).deserialize::<AssignmentCsvRow>() {
        let row = row?;
        let assigned_on = row.assigned_date.as_deref().and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                warn!(
                    submission_id = row.submission_id,
                    reviewer_id = row.reviewer_person_id,
                    value = raw,
                    "ignoring unparseable assignment date"
                );
            }
            parsed
        });

        records.push(AssignmentRow {
            submission_id: SubmissionId(row.submission_id),
            reviewer_person_id: PersonId(row.reviewer_person_id),
            status: row.status.unwrap_or_else(|| "assigned".to_string()),
            assigned_on,
        });
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct InstitutionRow {
    institution_id: i64,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompanyRow {
    company_id: i64,
    company_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PersonRow {
    person_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
    #[serde(default)]
    affiliation_id: Option<i64>,
    #[serde(default)]
    workplace_id: Option<i64>,
    #[serde(default)]
    bachelor_institution_id: Option<i64>,
    #[serde(default)]
    master_institution_id: Option<i64>,
    #[serde(default)]
    phd_institution_id: Option<i64>,
    #[serde(default)]
    advisor_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    research_group_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmissionRow {
    submission_id: i64,
    title: String,
    author_name: String,
    #[serde(default)]
    author_affiliation_id: Option<i64>,
    #[serde(default)]
    author_workplace_id: Option<i64>,
    #[serde(default)]
    author_bachelor_institution_id: Option<i64>,
    #[serde(default)]
    author_master_institution_id: Option<i64>,
    #[serde(default)]
    author_phd_institution_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    author_advisor_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    author_research_group: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    author_city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    author_state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    author_country: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssignmentCsvRow {
    submission_id: i64,
    reviewer_person_id: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    assigned_date: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339, SQLite `CURRENT_TIMESTAMP` output, and plain dates.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
