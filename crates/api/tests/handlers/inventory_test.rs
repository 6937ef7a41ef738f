use hospital_api::handlers::{
    doctor::{ensure_can_edit_hours, ensure_deleted},
    medicine::stock_adjustment_result,
    patient::ensure_can_view,
};
use hospital_core::{errors::HospitalError, models::user::Role};
use hospital_db::repositories::medicine::{rejected_adjustment, StockAdjustment};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{self, TestContext};

#[tokio::test]
async fn test_stock_adjustment_applies_delta() {
    let mut ctx = TestContext::new();
    let row = test_utils::medicine(40, 10);
    let id = row.id;

    ctx.medicine_repo
        .expect_adjust_stock()
        .with(eq(id), eq(-15))
        .times(1)
        .returning(move |_, delta| {
            let mut updated = row.clone();
            updated.stock_quantity += delta;
            Ok(StockAdjustment::Updated(updated))
        });

    let outcome = ctx.medicine_repo.adjust_stock(id, -15).await.unwrap();
    let medicine = stock_adjustment_result(id, -15, outcome).unwrap();

    assert_eq!(medicine.stock_quantity, 25);
    assert!(!medicine.is_low_stock());
}

#[tokio::test]
async fn test_stock_cannot_go_negative() {
    let mut ctx = TestContext::new();
    ctx.medicine_repo
        .expect_adjust_stock()
        .returning(|_, _| Ok(StockAdjustment::Insufficient { available: 3 }));

    let id = Uuid::new_v4();
    let outcome = ctx.medicine_repo.adjust_stock(id, -5).await.unwrap();
    let result = stock_adjustment_result(id, -5, outcome);

    match result {
        Err(HospitalError::Validation(message)) => {
            assert_eq!(message, "Cannot remove 5 units, only 3 in stock")
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stock_increase_beyond_column_limit_is_a_validation_error() {
    let mut ctx = TestContext::new();
    let row = test_utils::medicine(1, 0);
    let id = row.id;

    ctx.medicine_repo
        .expect_adjust_stock()
        .with(eq(id), eq(i32::MAX))
        .times(1)
        .returning(move |_, delta| Ok(rejected_adjustment(row.stock_quantity, delta)));

    let outcome = ctx.medicine_repo.adjust_stock(id, i32::MAX).await.unwrap();

    assert!(matches!(
        stock_adjustment_result(id, i32::MAX, outcome),
        Err(HospitalError::Validation(_))
    ));
}

#[tokio::test]
async fn test_stock_adjustment_for_missing_medicine() {
    let mut ctx = TestContext::new();
    ctx.medicine_repo
        .expect_adjust_stock()
        .returning(|_, _| Ok(StockAdjustment::NotFound));

    let id = Uuid::new_v4();
    let outcome = ctx.medicine_repo.adjust_stock(id, 10).await.unwrap();

    assert!(matches!(
        stock_adjustment_result(id, 10, outcome),
        Err(HospitalError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_low_stock_flag() {
    let mut ctx = TestContext::new();
    let row = test_utils::medicine(4, 5);
    let id = row.id;
    ctx.medicine_repo
        .expect_get_medicine_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(row.clone())));

    let medicine: hospital_core::models::medicine::Medicine = ctx
        .medicine_repo
        .get_medicine_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .into();

    assert!(medicine.is_low_stock());
}

#[rstest]
#[case(Role::Admin, false, true)]
#[case(Role::Staff, false, true)]
#[case(Role::Doctor, true, true)]
#[case(Role::Doctor, false, false)]
#[case(Role::Patient, true, false)]
fn test_who_may_edit_working_hours(#[case] role: Role, #[case] linked: bool, #[case] allowed: bool) {
    let user = test_utils::auth_user(role);
    let doctor = test_utils::doctor(if linked { Some(user.user_id) } else { None });

    assert_eq!(ensure_can_edit_hours(&user, &doctor).is_ok(), allowed);
}

#[tokio::test]
async fn test_patient_reads_only_own_record() {
    let mut ctx = TestContext::new();
    let user = test_utils::auth_user(Role::Patient);
    let own = test_utils::patient(Some(user.user_id));
    let own_id = own.id;

    ctx.patient_repo
        .expect_get_patient_by_user_id()
        .with(eq(user.user_id))
        .returning(move |_| Ok(Some(own.clone())));

    let record = ctx
        .patient_repo
        .get_patient_by_user_id(user.user_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.id, own_id);
    assert!(ensure_can_view(&user, &record).is_ok());
    assert!(matches!(
        ensure_can_view(&user, &test_utils::patient(None)),
        Err(HospitalError::Authorization(_))
    ));
    assert!(ensure_can_view(&test_utils::auth_user(Role::Doctor), &record).is_ok());
}

#[test]
fn test_doctor_with_appointment_history_is_not_deleted() {
    let id = Uuid::new_v4();

    assert!(ensure_deleted(id, true).is_ok());
    match ensure_deleted(id, false) {
        Err(HospitalError::Conflict(message)) => assert!(message.contains(&id.to_string())),
        other => panic!("expected conflict, got {:?}", other),
    }
}
