use crate::infra::InMemoryReviewDirectory;
use clap::Args;
use reviewmatch::config::AppConfig;
use reviewmatch::error::AppError;
use reviewmatch::telemetry::{self, LogSink};
use reviewmatch::workflows::dataset::{DatasetImporter, ReviewDataset};
use reviewmatch::workflows::separation::{
    AdminAllowList, AuthorReviewerConnection, ComparisonFactor, ConnectionService, SubmissionId,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct ConnectionsReportArgs {
    /// Directory holding the CSV exports (defaults to APP_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    pub(crate) data_dir: Option<PathBuf>,
    /// Administrator email checked against APP_ADMIN_EMAILS
    #[arg(long, value_name = "EMAIL")]
    pub(crate) admin: String,
    /// Restrict the report to a single submission id
    #[arg(long, value_name = "ID")]
    pub(crate) submission: Option<i64>,
    /// Print every compared factor beneath each assignment
    #[arg(long)]
    pub(crate) show_factors: bool,
    /// Only print these factors (repeatable, e.g. `--factor advisor`); implies --show-factors
    #[arg(long = "factor", value_name = "KEY")]
    pub(crate) factors: Vec<String>,
}

pub(crate) fn run_connections_report(args: ConnectionsReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let data_dir = args.data_dir.or(config.directory.data_dir);
    let dataset = match data_dir {
        Some(dir) => DatasetImporter::from_dir(dir)?,
        None => {
            warn!("no data directory configured; reporting on an empty dataset");
            ReviewDataset::default()
        }
    };

    let directory = Arc::new(InMemoryReviewDirectory::from_dataset(dataset));
    let authorizer = Arc::new(AdminAllowList::new(config.access.admin_emails));
    let service = ConnectionService::new(directory, authorizer);

    let credential = Some(args.admin.as_str());
    let connections = match args.submission {
        Some(id) => service.for_submission(credential, SubmissionId(id))?,
        None => service.list(credential)?,
    };

    let only = selected_factors(&args.factors);
    let show_factors = args.show_factors || !only.is_empty();
    print!("{}", render_matrix(&connections, show_factors, &only));
    Ok(())
}

/// Unknown keys are logged and left out of the selection.
pub(crate) fn selected_factors(keys: &[String]) -> Vec<ComparisonFactor> {
    let mut selected = Vec::new();
    for key in keys {
        match key.parse::<ComparisonFactor>() {
            Ok(factor) if !selected.contains(&factor) => selected.push(factor),
            Ok(_) => {}
            Err(err) => warn!(%err, "ignoring factor filter"),
        }
    }
    selected
}

/// An empty `only` prints every factor.
pub(crate) fn render_matrix(
    connections: &[AuthorReviewerConnection],
    show_factors: bool,
    only: &[ComparisonFactor],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Author/reviewer connection matrix");

    if connections.is_empty() {
        let _ = writeln!(out, "No reviewer assignments found.");
        return out;
    }

    let mut current = None;
    for connection in connections {
        if current != Some(connection.submission_id) {
            current = Some(connection.submission_id);
            let _ = writeln!(
                out,
                "\n#{} {} (author: {})",
                connection.submission_id, connection.paper_title, connection.author_name
            );
        }

        let _ = writeln!(
            out,
            "  - {} <{}> [{}] {}/{} conflicts, score {} ({})",
            connection.reviewer_name,
            connection.reviewer_email,
            connection.assignment_status.label(),
            connection.degrees_of_separation,
            connection.max_possible_conflicts,
            connection.separation_score,
            connection.separation_label.label(),
        );

        if show_factors {
            let shown = connection
                .connection_factors
                .iter()
                .filter(|factor| only.is_empty() || only.contains(&factor.kind));
            for factor in shown {
                let marker = if factor.is_conflict { "!" } else { " " };
                let _ = writeln!(
                    out,
                    "      {} {} {}: author={} reviewer={}",
                    marker,
                    factor.icon,
                    factor.factor,
                    factor.author_value.as_deref().unwrap_or("-"),
                    factor.reviewer_value.as_deref().unwrap_or("-"),
                );
            }
        }
    }

    let conflicted = connections
        .iter()
        .filter(|connection| connection.degrees_of_separation > 0)
        .count();
    let _ = writeln!(
        out,
        "\n{} assignments, {} with at least one conflict",
        connections.len(),
        conflicted
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewmatch::workflows::separation::{
        AffiliationBundle, AssignmentStatus, PersonId, SeparationScorer,
    };

    fn connection(submission: i64, reviewer: &str, shared_group: bool) -> AuthorReviewerConnection {
        let mut author = AffiliationBundle::default();
        let mut reviewer_bundle = AffiliationBundle::default();
        author.research_group = Some("Systems Lab".to_string());
        reviewer_bundle.research_group = Some(if shared_group {
            "systems lab".to_string()
        } else {
            "Theory Group".to_string()
        });
        let summary = SeparationScorer::new().score(&author, &reviewer_bundle);

        AuthorReviewerConnection {
            submission_id: SubmissionId(submission),
            paper_title: format!("Paper {submission}"),
            author_name: "Alan Author".to_string(),
            reviewer_id: PersonId(1),
            reviewer_name: reviewer.to_string(),
            reviewer_email: format!("{}@example.org", reviewer.to_lowercase()),
            degrees_of_separation: summary.degrees_of_separation,
            max_possible_conflicts: summary.max_possible_conflicts,
            separation_score: summary.separation_score,
            separation_label: summary.label,
            assignment_status: AssignmentStatus::Assigned,
            assigned_on: None,
            connection_factors: summary.factors,
        }
    }

    #[test]
    fn empty_matrix_says_so() {
        let rendered = render_matrix(&[], false, &[]);
        assert!(rendered.contains("No reviewer assignments found."));
    }

    #[test]
    fn groups_rows_under_each_submission() {
        let rows = vec![
            connection(1, "Rita", true),
            connection(1, "Omar", false),
            connection(2, "Rita", false),
        ];
        let rendered = render_matrix(&rows, false, &[]);

        assert_eq!(rendered.matches("#1 Paper 1").count(), 1);
        assert_eq!(rendered.matches("#2 Paper 2").count(), 1);
        assert!(rendered.contains("Rita <rita@example.org> [Assigned] 1/8 conflicts, score 88 (Excellent Separation)"));
        assert!(rendered.contains("3 assignments, 1 with at least one conflict"));
        assert!(!rendered.contains("author="));
    }

    #[test]
    fn factor_filter_limits_printed_factors() {
        let rendered = render_matrix(
            &[connection(1, "Rita", true)],
            true,
            &[ComparisonFactor::ResearchGroup, ComparisonFactor::Advisor],
        );
        let factor_lines: Vec<&str> = rendered.lines().filter(|line| line.contains("author=")).collect();

        assert_eq!(factor_lines.len(), 2);
        assert!(factor_lines[0].contains("Advisor"));
        assert!(factor_lines[1].contains("Research Group"));
    }

    #[test]
    fn unknown_factor_keys_are_skipped() {
        let keys = vec![
            "research-group".to_string(),
            "shoe_size".to_string(),
            "ADVISOR".to_string(),
            "advisor".to_string(),
        ];
        assert_eq!(
            selected_factors(&keys),
            vec![ComparisonFactor::ResearchGroup, ComparisonFactor::Advisor]
        );
    }

    #[test]
    fn factor_lines_mark_conflicts() {
        let rendered = render_matrix(&[connection(1, "Rita", true)], true, &[]);
        let conflict_lines: Vec<&str> = rendered
            .lines()
            .filter(|line| line.trim_start().starts_with('!'))
            .collect();

        assert_eq!(conflict_lines.len(), 1);
        assert!(conflict_lines[0].contains("author=Systems Lab reviewer=systems lab"));
        assert!(rendered.contains("author=- reviewer=-"));
    }
}
