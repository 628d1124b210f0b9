use super::common::*;
use crate::workflows::survey::domain::{
    Certificate, CertificateId, ShipContext, SurveyCategory, SurveyStatus, ValidationError,
};
use crate::workflows::survey::engine::SurveyScheduler;
use crate::workflows::survey::repository::{CertificateRecord, RepositoryError};
use crate::workflows::survey::service::{
    CertificateDateUpdate, SurveyScheduleService, SurveyServiceError,
};
use std::sync::Arc;

#[test]
fn register_recalculates_and_persists_the_result() {
    let (service, repository) = build_service();

    let record = service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");

    assert!(record.id.0.starts_with("cert-"));
    assert_eq!(record.result.category, SurveyCategory::AnnualCycle);
    assert_eq!(record.result.next_survey_date, Some(date(2026, 6, 28)));
    assert_eq!(record.result.next_survey_type, "Intermediate Survey");
    assert_eq!(record.result.status, SurveyStatus::Valid);
    assert_eq!(repository.writes(), 1);

    let stored = service.get(&record.id).expect("stored record");
    assert_eq!(stored, record);
}

#[test]
fn register_rejects_malformed_dates_without_persisting() {
    let (service, repository) = build_service();
    let mut input = safety_equipment_input();
    input.valid_date = Some("28.06.28".to_string());

    match service.register(register_request(input), today()) {
        Err(SurveyServiceError::Validation(ValidationError::InvalidDate { field, .. })) => {
            assert_eq!(field, "valid_date");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(repository.writes(), 0);
}

#[test]
fn update_dates_skips_the_write_when_nothing_changed() {
    let (service, repository) = build_service();
    let record = service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");

    let outcome = service
        .update_dates(
            &record.id,
            CertificateDateUpdate {
                last_endorse: Some("16/07/2025".to_string()),
                ..CertificateDateUpdate::default()
            },
            today(),
        )
        .expect("update succeeds");

    assert!(!outcome.changed);
    assert_eq!(outcome.record, record);
    assert_eq!(repository.writes(), 1);
}

#[test]
fn update_dates_recalculates_after_a_new_endorsement() {
    let (service, repository) = build_service();
    let record = service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");

    let outcome = service
        .update_dates(
            &record.id,
            CertificateDateUpdate {
                last_endorse: Some("2026-07-01".to_string()),
                ..CertificateDateUpdate::default()
            },
            date(2026, 7, 2),
        )
        .expect("update succeeds");

    assert!(outcome.changed);
    assert_eq!(outcome.record.certificate.last_endorse, Some(date(2026, 7, 1)));
    assert_eq!(outcome.record.result.next_survey_date, Some(date(2027, 6, 28)));
    assert_eq!(outcome.record.result.next_survey_type, "4th Annual Survey");
    assert_eq!(repository.writes(), 2);
}

#[test]
fn update_dates_can_clear_the_validity_date() {
    let (service, _) = build_service();
    let record = service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");

    let outcome = service
        .update_dates(
            &record.id,
            CertificateDateUpdate {
                valid_date: Some(String::new()),
                ..CertificateDateUpdate::default()
            },
            today(),
        )
        .expect("update succeeds");

    assert_eq!(outcome.record.certificate.valid_date, None);
    assert_eq!(outcome.record.result.status, SurveyStatus::NotApplicable);
    assert_eq!(outcome.record.result.next_survey_display, "-");
}

#[test]
fn update_dates_rejects_inconsistent_dates_and_keeps_the_stored_record() {
    let (service, _) = build_service();
    let record = service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");

    match service.update_dates(
        &record.id,
        CertificateDateUpdate {
            issue_date: Some("2029-01-01".to_string()),
            ..CertificateDateUpdate::default()
        },
        today(),
    ) {
        Err(SurveyServiceError::Validation(ValidationError::IssueAfterExpiry { .. })) => {}
        other => panic!("expected inconsistent dates, got {other:?}"),
    }

    assert_eq!(service.get(&record.id).expect("stored record"), record);
}

#[test]
fn ship_context_renames_the_third_annual_slot() {
    let (service, _) = build_service();
    let record = service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");

    let report = service
        .update_ship_context(
            &ship_id(),
            ShipContext {
                last_intermediate_survey: Some(date(2025, 7, 16)),
            },
            today(),
        )
        .expect("context saved");

    assert_eq!(report.upcoming.len(), 1);
    assert_eq!(report.upcoming[0].next_survey_type, "3rd Annual Survey");
    assert_eq!(
        service.get(&record.id).expect("stored").result.next_survey_type,
        "3rd Annual Survey"
    );
}

#[test]
fn recalculate_ship_isolates_failures_and_reports_every_certificate() {
    let (service, repository) = build_service();
    let good = service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");
    service
        .register(register_request(tonnage_input()), today())
        .expect("tonnage registers");

    let broken = Certificate::named("International Load Line Certificate").with_dates(
        Some(date(2030, 1, 1)),
        Some(date(2028, 6, 28)),
        None,
    );
    repository.overwrite(CertificateRecord {
        id: CertificateId("cert-legacy".to_string()),
        ship_id: ship_id(),
        certificate: broken,
        result: good.result.clone(),
    });

    let report = service
        .recalculate_ship(&ship_id(), today())
        .expect("batch runs");

    assert_eq!(report.count(SurveyStatus::Valid), 2);
    assert_eq!(report.upcoming.len(), 1);
    assert_eq!(report.upcoming[0].certificate_id, good.id);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].field, "issue_date");
    assert_eq!(report.failures[0].next_survey_display, "-");
}

#[test]
fn recalculate_ship_only_writes_changed_results() {
    let (service, repository) = build_service();
    service
        .register(register_request(safety_equipment_input()), today())
        .expect("certificate registers");
    service
        .register(register_request(tonnage_input()), today())
        .expect("tonnage registers");
    assert_eq!(repository.writes(), 2);

    service
        .recalculate_ship(&ship_id(), today())
        .expect("batch runs");
    assert_eq!(repository.writes(), 2);

    let report = service
        .recalculate_ship(&ship_id(), date(2026, 9, 10))
        .expect("batch runs");
    assert_eq!(repository.writes(), 3);
    assert_eq!(report.upcoming[0].status, SurveyStatus::DueSoon);
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();

    match service.get(&CertificateId("missing".to_string())) {
        Err(SurveyServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn register_propagates_repository_failures() {
    let service = SurveyScheduleService::new(
        Arc::new(UnavailableRepository),
        SurveyScheduler::default(),
    );

    match service.register(register_request(safety_equipment_input()), today()) {
        Err(SurveyServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}
