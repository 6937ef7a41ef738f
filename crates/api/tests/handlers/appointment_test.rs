use hospital_api::handlers::appointment::*;
use hospital_core::{
    availability::TimeOfDay,
    errors::HospitalError,
    models::{appointment::AppointmentStatus, user::Role},
};
use hospital_db::repositories::appointment::AppointmentFilter;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{self, TestContext};

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

#[rstest]
#[case("09:00", true)]
#[case("09:15", true)]
#[case("16:59", true)]
#[case("08:59", false)]
#[case("17:00", false)]
#[case("18:30", false)]
fn test_booking_must_start_within_hours(#[case] start: &str, #[case] inside: bool) {
    let doctor_id = Uuid::new_v4();
    let hours = test_utils::working_hours(doctor_id, 1, "09:00", "17:00");

    let result = check_booking(Some(&hours), &[], t(start));

    if inside {
        assert!(result.is_ok());
    } else {
        assert!(matches!(result, Err(HospitalError::Validation(_))));
    }
}

#[test]
fn test_booking_on_day_off_is_rejected() {
    let result = check_booking(None, &[], t("10:00"));
    assert!(matches!(result, Err(HospitalError::Validation(_))));
}

#[test]
fn test_booking_with_malformed_stored_hours_is_rejected() {
    let hours = test_utils::working_hours(Uuid::new_v4(), 1, "17:00", "09:00");
    let result = check_booking(Some(&hours), &[], t("10:00"));
    assert!(matches!(result, Err(HospitalError::Validation(_))));
}

#[rstest]
#[case("10:00", false)]
#[case("10:45", false)]
#[case("11:00", true)]
#[case("09:30", true)]
fn test_booking_inside_existing_appointment_conflicts(#[case] start: &str, #[case] free: bool) {
    let doctor_id = Uuid::new_v4();
    let hours = test_utils::working_hours(doctor_id, 1, "09:00", "17:00");
    let existing = vec![test_utils::booking(doctor_id, "10:00", 60)];

    let result = check_booking(Some(&hours), &existing, t(start));

    if free {
        assert!(result.is_ok());
    } else {
        assert!(matches!(result, Err(HospitalError::Conflict(_))));
    }
}

#[test]
fn test_overlap_that_starts_before_booking_is_accepted() {
    // Only the start instant is checked, matching the free-slot listing
    let doctor_id = Uuid::new_v4();
    let hours = test_utils::working_hours(doctor_id, 1, "09:00", "17:00");
    let existing = vec![test_utils::booking(doctor_id, "10:00", 30)];

    assert!(check_booking(Some(&hours), &existing, t("09:45")).is_ok());
}

#[tokio::test]
async fn test_booking_checked_against_mocked_schedule() {
    let mut ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let date = test_utils::monday();

    let hours = test_utils::working_hours(doctor_id, 1, "08:00", "12:00");
    ctx.doctor_repo
        .expect_get_working_hours_for_day()
        .with(eq(doctor_id), eq(1))
        .returning(move |_, _| Ok(Some(hours.clone())));

    let existing = vec![test_utils::booking(doctor_id, "08:30", 30)];
    ctx.appointment_repo
        .expect_get_active_appointments_for_doctor()
        .with(eq(doctor_id), eq(date))
        .returning(move |_, _| Ok(existing.clone()));

    let hours = ctx.doctor_repo.get_working_hours_for_day(doctor_id, 1).await.unwrap();
    let existing = ctx
        .appointment_repo
        .get_active_appointments_for_doctor(doctor_id, date)
        .await
        .unwrap();

    assert!(check_booking(hours.as_ref(), &existing, t("08:00")).is_ok());
    assert!(matches!(
        check_booking(hours.as_ref(), &existing, t("08:40")),
        Err(HospitalError::Conflict(_))
    ));
}

#[rstest]
#[case(Role::Admin, false, true)]
#[case(Role::Staff, false, true)]
#[case(Role::Patient, true, true)]
#[case(Role::Patient, false, false)]
#[case(Role::Doctor, true, false)]
fn test_who_may_book(#[case] role: Role, #[case] own_record: bool, #[case] allowed: bool) {
    let user = test_utils::auth_user(role);
    let owner = if own_record { Some(user.user_id) } else { Some(Uuid::new_v4()) };
    let patient = test_utils::patient(owner);

    let result = ensure_can_book(&user, &patient);

    if allowed {
        assert!(result.is_ok());
    } else {
        assert!(matches!(result, Err(HospitalError::Authorization(_))));
    }
}

#[test]
fn test_scope_overrides_requested_filter() {
    let own = Uuid::new_v4();
    let requested = AppointmentFilter {
        doctor_id: Some(Uuid::new_v4()),
        status: Some(AppointmentStatus::Scheduled),
        ..Default::default()
    };

    let filter = AppointmentScope::Doctor(own).restrict(requested.clone());
    assert_eq!(filter.doctor_id, Some(own));
    assert_eq!(filter.status, Some(AppointmentStatus::Scheduled));

    let filter = AppointmentScope::Patient(own).restrict(requested.clone());
    assert_eq!(filter.patient_id, Some(own));
    assert_eq!(filter.doctor_id, requested.doctor_id);

    assert_eq!(AppointmentScope::All.restrict(requested.clone()), requested);
}

#[test]
fn test_scope_permits_only_own_appointments() {
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();
    let row = test_utils::appointment(doctor_id, patient_id, Some("09:00"), 30, "SCHEDULED");

    assert!(AppointmentScope::All.permits(&row));
    assert!(AppointmentScope::Doctor(doctor_id).permits(&row));
    assert!(AppointmentScope::Patient(patient_id).permits(&row));
    assert!(!AppointmentScope::Doctor(Uuid::new_v4()).permits(&row));
    assert!(!AppointmentScope::Patient(doctor_id).permits(&row));
}

#[tokio::test]
async fn test_status_update_follows_transition_rules() {
    let mut ctx = TestContext::new();
    let row = test_utils::appointment(Uuid::new_v4(), Uuid::new_v4(), Some("09:00"), 30, "COMPLETED");
    let id = row.id;

    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .with(eq(id))
        .times(2)
        .returning(move |_| Ok(Some(row.clone())));

    let stored = ctx.appointment_repo.get_appointment_by_id(id).await.unwrap().unwrap();
    let current = stored.status().unwrap();
    assert_eq!(current, AppointmentStatus::Completed);
    assert!(matches!(
        current.transition_to(AppointmentStatus::Scheduled),
        Err(HospitalError::Validation(_))
    ));

    let stored = ctx.appointment_repo.get_appointment_by_id(id).await.unwrap().unwrap();
    assert!(!stored.status().unwrap().is_active());
}

#[tokio::test]
async fn test_second_concurrent_transition_conflicts() {
    let mut ctx = TestContext::new();
    let row = test_utils::appointment(Uuid::new_v4(), Uuid::new_v4(), Some("09:00"), 30, "IN_PROGRESS");
    let id = row.id;

    // The first writer moves the row on; the second finds it no longer IN_PROGRESS
    let mut stored = Some(row);
    ctx.appointment_repo
        .expect_update_appointment_status()
        .with(
            eq(id),
            eq(AppointmentStatus::InProgress),
            mockall::predicate::always(),
            eq(None::<String>),
        )
        .times(2)
        .returning(move |_, _, next, _| {
            Ok(stored.take().map(|mut row| {
                row.status = next.as_str().to_string();
                row
            }))
        });

    let current = AppointmentStatus::InProgress;
    let completed = current.transition_to(AppointmentStatus::Completed).unwrap();
    let cancelled = current.transition_to(AppointmentStatus::Cancelled).unwrap();

    let first = ctx
        .appointment_repo
        .update_appointment_status(id, current, completed, None)
        .await
        .unwrap();
    let applied = ensure_transition_applied(id, current, first).unwrap();
    assert_eq!(applied.status().unwrap(), AppointmentStatus::Completed);

    let second = ctx
        .appointment_repo
        .update_appointment_status(id, current, cancelled, None)
        .await
        .unwrap();
    assert!(matches!(
        ensure_transition_applied(id, current, second),
        Err(HospitalError::Conflict(_))
    ));
}
