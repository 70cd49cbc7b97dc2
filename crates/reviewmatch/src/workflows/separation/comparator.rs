use serde::Serialize;

use super::domain::{AffiliationBundle, ComparisonFactor, Location};

/// Outcome of comparing one factor between an author and a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionFactor {
    #[serde(skip)]
    pub kind: ComparisonFactor,
    pub factor: &'static str,
    pub author_value: Option<String>,
    pub reviewer_value: Option<String>,
    pub is_conflict: bool,
    pub icon: &'static str,
}

pub fn compare(
    factor: ComparisonFactor,
    author: &AffiliationBundle,
    reviewer: &AffiliationBundle,
) -> ConnectionFactor {
    let (author_value, reviewer_value, is_conflict) = match factor {
        ComparisonFactor::Location => (
            author.location.display(),
            reviewer.location.display(),
            locations_collide(&author.location, &reviewer.location),
        ),
        _ => {
            let left = author.text(factor);
            let right = reviewer.text(factor);
            (shown(left), shown(right), values_collide(left, right))
        }
    };

    ConnectionFactor {
        kind: factor,
        factor: factor.label(),
        author_value,
        reviewer_value,
        is_conflict,
        icon: factor.icon(),
    }
}

fn shown(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

pub(crate) fn values_collide(left: Option<&str>, right: Option<&str>) -> bool {
    match (normalized(left), normalized(right)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Compares city, state, and country as one value. Both sides must know the same parts
/// and agree on every one of them.
pub(crate) fn locations_collide(left: &Location, right: &Location) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }

    left.parts()
        .into_iter()
        .zip(right.parts())
        .all(|(left, right)| match (normalized(left), normalized(right)) {
            (Some(left), Some(right)) => left == right,
            (None, None) => true,
            _ => false,
        })
}
