use super::common::*;
use crate::workflows::separation::domain::{AffiliationBundle, ComparisonFactor, Location};
use crate::workflows::separation::scorer::{
    separation_score, SeparationLabel, SeparationScorer, MAX_POSSIBLE_CONFLICTS,
};

fn scorer() -> SeparationScorer {
    SeparationScorer::new()
}

#[test]
fn single_shared_affiliation_scores_excellent() {
    let author = AffiliationBundle {
        affiliation: Some("State University".to_string()),
        ..AffiliationBundle::default()
    };
    let reviewer = author.clone();

    let summary = scorer().score(&author, &reviewer);

    assert_eq!(summary.degrees_of_separation, 1);
    assert_eq!(summary.max_possible_conflicts, 8);
    assert_eq!(summary.separation_score, 88);
    assert_eq!(summary.label, SeparationLabel::Excellent);
}

#[test]
fn every_factor_matching_scores_zero() {
    let summary = scorer().score(&full_bundle(), &full_bundle());

    assert_eq!(summary.degrees_of_separation, 8);
    assert_eq!(summary.separation_score, 0);
    assert_eq!(summary.label, SeparationLabel::Low);
    assert_eq!(summary.conflicting().count(), 8);
}

#[test]
fn reviewer_without_data_scores_full_separation() {
    let summary = scorer().score(&full_bundle(), &AffiliationBundle::default());

    assert_eq!(summary.degrees_of_separation, 0);
    assert_eq!(summary.separation_score, 100);
    assert_eq!(summary.label, SeparationLabel::Excellent);
}

#[test]
fn partial_location_overlap_contributes_nothing() {
    let author = AffiliationBundle {
        location: Location::new(Some("Boston".to_string()), None, Some("USA".to_string())),
        ..AffiliationBundle::default()
    };
    let reviewer = AffiliationBundle {
        location: Location::new(None, None, Some("USA".to_string())),
        ..AffiliationBundle::default()
    };

    let summary = scorer().score(&author, &reviewer);

    assert_eq!(summary.degrees_of_separation, 0);
    let location = summary.factors.last().expect("location factor present");
    assert_eq!(location.kind, ComparisonFactor::Location);
    assert!(!location.is_conflict);
}

#[test]
fn factors_follow_enumeration_order() {
    let summary = scorer().score(&full_bundle(), &AffiliationBundle::default());
    let kinds: Vec<ComparisonFactor> = summary.factors.iter().map(|factor| factor.kind).collect();
    assert_eq!(kinds, ComparisonFactor::ALL.to_vec());
}

#[test]
fn scoring_is_idempotent() {
    let reviewer = AffiliationBundle {
        advisor: Some("ada lovelace".to_string()),
        location: boston(),
        ..AffiliationBundle::default()
    };

    let first = scorer().score(&full_bundle(), &reviewer);
    let second = scorer().score(&full_bundle(), &reviewer);
    assert_eq!(first, second);
}

#[test]
fn adding_a_matching_factor_never_raises_the_score() {
    let author = full_bundle();
    let donor = full_bundle();
    let mut reviewer = AffiliationBundle::default();
    let mut previous = scorer().score(&author, &reviewer);

    let steps: [fn(&mut AffiliationBundle, &AffiliationBundle); 8] = [
        |r, d| r.affiliation = d.affiliation.clone(),
        |r, d| r.workplace = d.workplace.clone(),
        |r, d| r.bachelor_institution = d.bachelor_institution.clone(),
        |r, d| r.master_institution = d.master_institution.clone(),
        |r, d| r.phd_institution = d.phd_institution.clone(),
        |r, d| r.advisor = d.advisor.clone(),
        |r, d| r.research_group = d.research_group.clone(),
        |r, d| r.location = d.location.clone(),
    ];

    for step in steps {
        step(&mut reviewer, &donor);
        let current = scorer().score(&author, &reviewer);
        assert_eq!(current.degrees_of_separation, previous.degrees_of_separation + 1);
        assert!(current.separation_score <= previous.separation_score);
        assert!(current.degrees_of_separation <= current.max_possible_conflicts);
        previous = current;
    }
}

#[test]
fn score_rounds_halves_up_and_stays_in_bounds() {
    let expected = [100, 88, 75, 63, 50, 38, 25, 13, 0];
    for (conflicts, score) in expected.iter().enumerate() {
        assert_eq!(separation_score(conflicts as u8, MAX_POSSIBLE_CONFLICTS), *score);
    }
    assert_eq!(separation_score(12, MAX_POSSIBLE_CONFLICTS), 0);
    assert_eq!(separation_score(0, 0), 100);
}

#[test]
fn labels_use_inclusive_lower_bounds() {
    assert_eq!(SeparationLabel::from_score(100), SeparationLabel::Excellent);
    assert_eq!(SeparationLabel::from_score(80), SeparationLabel::Excellent);
    assert_eq!(SeparationLabel::from_score(79), SeparationLabel::Good);
    assert_eq!(SeparationLabel::from_score(60), SeparationLabel::Good);
    assert_eq!(SeparationLabel::from_score(59), SeparationLabel::Moderate);
    assert_eq!(SeparationLabel::from_score(40), SeparationLabel::Moderate);
    assert_eq!(SeparationLabel::from_score(39), SeparationLabel::Low);
    assert_eq!(SeparationLabel::from_score(0), SeparationLabel::Low);
    assert_eq!(SeparationLabel::Good.label(), "Good Separation");
}
