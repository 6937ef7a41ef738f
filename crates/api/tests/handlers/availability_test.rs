use chrono::NaiveDate;
use hospital_api::handlers::{availability::*, parse_date};
use hospital_core::{errors::HospitalError, models::appointment::AvailableSlotsResponse};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{self, TestContext};

fn slot_strings(response: &AvailableSlotsResponse) -> Vec<String> {
    response.slots.iter().map(ToString::to_string).collect()
}

// Fetches through the mocked repositories the same way the handler does
async fn available_slots(
    ctx: &TestContext,
    doctor_id: Uuid,
    date: NaiveDate,
) -> eyre::Result<AvailableSlotsResponse> {
    let hours = ctx
        .doctor_repo
        .get_working_hours_for_day(doctor_id, day_of_week(date))
        .await?;
    let bookings = ctx
        .appointment_repo
        .get_active_appointments_for_doctor(doctor_id, date)
        .await?;
    Ok(build_available_slots(doctor_id, date, hours, &bookings, 30))
}

#[tokio::test]
async fn test_slots_skip_booked_times() {
    let mut ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let date = test_utils::monday();

    let hours = test_utils::working_hours(doctor_id, 1, "09:00", "12:00");
    ctx.doctor_repo
        .expect_get_working_hours_for_day()
        .with(eq(doctor_id), eq(1))
        .times(1)
        .returning(move |_, _| Ok(Some(hours.clone())));

    let bookings = vec![
        test_utils::booking(doctor_id, "09:00", 30),
        test_utils::booking(doctor_id, "10:30", 60),
    ];
    ctx.appointment_repo
        .expect_get_active_appointments_for_doctor()
        .with(eq(doctor_id), eq(date))
        .times(1)
        .returning(move |_, _| Ok(bookings.clone()));

    let response = available_slots(&ctx, doctor_id, date).await.unwrap();

    assert_eq!(slot_strings(&response), vec!["09:30", "10:00", "11:30"]);
    assert_eq!(response.slot_length_minutes, 30);
    assert_eq!(
        response.working_hours.map(|h| (h.start_time, h.end_time)),
        Some(("09:00".to_string(), "12:00".to_string()))
    );
}

#[tokio::test]
async fn test_day_without_hours_has_no_slots() {
    let mut ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let sunday = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

    ctx.doctor_repo
        .expect_get_working_hours_for_day()
        .with(eq(doctor_id), eq(0))
        .returning(|_, _| Ok(None));
    ctx.appointment_repo
        .expect_get_active_appointments_for_doctor()
        .returning(|_, _| Ok(Vec::new()));

    let response = available_slots(&ctx, doctor_id, sunday).await.unwrap();

    assert!(response.slots.is_empty());
    assert!(response.working_hours.is_none());
}

#[tokio::test]
async fn test_repository_failure_propagates() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_get_working_hours_for_day()
        .returning(|_, _| Err(eyre::eyre!("connection reset")));

    let result = available_slots(&ctx, Uuid::new_v4(), test_utils::monday()).await;

    assert!(result.is_err());
}

#[test]
fn test_unusable_bookings_are_ignored() {
    let doctor_id = Uuid::new_v4();
    let hours = test_utils::working_hours(doctor_id, 1, "09:00", "10:00");
    let bookings = vec![
        test_utils::appointment(doctor_id, Uuid::new_v4(), None, 30, "SCHEDULED"),
        test_utils::booking(doctor_id, "9h30", 30),
        test_utils::booking(doctor_id, "09:30", 0),
    ];

    let response = build_available_slots(doctor_id, test_utils::monday(), Some(hours), &bookings, 30);

    assert_eq!(slot_strings(&response), vec!["09:00", "09:30"]);
}

#[test]
fn test_last_slot_may_run_past_closing() {
    let doctor_id = Uuid::new_v4();
    let hours = test_utils::working_hours(doctor_id, 1, "09:00", "09:45");

    let response = build_available_slots(doctor_id, test_utils::monday(), Some(hours), &[], 30);

    assert_eq!(slot_strings(&response), vec!["09:00", "09:30"]);
}

#[test]
fn test_malformed_stored_hours_yield_no_slots() {
    let doctor_id = Uuid::new_v4();
    let hours = test_utils::working_hours(doctor_id, 1, "nine", "17:00");

    let response = build_available_slots(doctor_id, test_utils::monday(), Some(hours), &[], 30);

    assert!(response.slots.is_empty());
    assert!(response.working_hours.is_some());
}

#[test]
fn test_response_serializes_times_as_strings() {
    let doctor_id = Uuid::new_v4();
    let hours = test_utils::working_hours(doctor_id, 1, "14:00", "15:00");

    let response = build_available_slots(doctor_id, test_utils::monday(), Some(hours), &[], 30);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["slots"], serde_json::json!(["14:00", "14:30"]));
    assert_eq!(json["date"], "2026-03-16");
    assert_eq!(json["working_hours"]["day_of_week"], 1);
}

#[rstest]
#[case(2026, 3, 15, 0)]
#[case(2026, 3, 16, 1)]
#[case(2026, 3, 18, 3)]
#[case(2026, 3, 21, 6)]
fn test_day_of_week_counts_from_sunday(
    #[case] year: i32,
    #[case] month: u32,
    #[case] day: u32,
    #[case] expected: i16,
) {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    assert_eq!(day_of_week(date), expected);
}

#[rstest]
#[case("2026-03-16", true)]
#[case(" 2026-03-16 ", true)]
#[case("16/03/2026", false)]
#[case("2026-02-30", false)]
#[case("", false)]
fn test_parse_date(#[case] input: &str, #[case] ok: bool) {
    match parse_date(input) {
        Ok(date) => {
            assert!(ok, "expected '{}' to be rejected", input);
            assert_eq!(date, test_utils::monday());
        }
        Err(err) => {
            assert!(!ok, "expected '{}' to parse", input);
            assert!(matches!(err, HospitalError::Validation(_)));
        }
    }
}
