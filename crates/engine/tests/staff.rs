use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, LedgerError, LoanStatus, MoneyCents, StaffEditCmd};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

async fn add_user(db: &DatabaseConnection, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec![username.into(), "password".into()],
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn roster_lists_members_by_name_and_scopes_to_store() {
    let (engine, _db) = engine_with_db().await;
    let store = engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();
    let other = engine
        .new_store("Annex", "2 Side St", None, "alice")
        .await
        .unwrap();

    engine
        .new_staff(store.id, "Carol", Some("manager"), "alice")
        .await
        .unwrap();
    let roster = engine
        .new_staff(store.id, "Bob", None, "alice")
        .await
        .unwrap();
    engine
        .new_staff(other.id, "Dave", None, "alice")
        .await
        .unwrap();

    let names: Vec<&str> = roster.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Carol"]);
    assert!(roster.iter().all(|m| m.store_id == store.id));
    assert!(roster.iter().all(|m| m.active && m.loan.is_none()));

    let other_roster = engine.staff(other.id, "alice").await.unwrap();
    assert_eq!(other_roster.len(), 1);
    assert_eq!(other_roster[0].name, "Dave");
}

#[tokio::test]
async fn staff_of_another_users_store_is_hidden() {
    let (engine, db) = engine_with_db().await;
    add_user(&db, "mallory").await;
    let store = engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();
    let roster = engine
        .new_staff(store.id, "Bob", None, "alice")
        .await
        .unwrap();

    let err = engine.staff(store.id, "mallory").await.unwrap_err();
    assert!(matches!(err, LedgerError::StoreNotFound(_)));
    let err = engine
        .new_staff(store.id, "Eve", None, "mallory")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::StoreNotFound(_)));
    let err = engine
        .remove_staff(roster[0].id, "mallory")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::StoreNotFound(_)));
}

#[tokio::test]
async fn editing_updates_only_the_given_fields() {
    let (engine, _db) = engine_with_db().await;
    let store = engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();
    let roster = engine
        .new_staff(store.id, "Bob", Some("attendant"), "alice")
        .await
        .unwrap();

    let roster = engine
        .edit_staff(StaffEditCmd::new(roster[0].id, "alice").active(false))
        .await
        .unwrap();
    assert_eq!(roster[0].name, "Bob");
    assert_eq!(roster[0].position.as_deref(), Some("attendant"));
    assert!(!roster[0].active);

    let roster = engine
        .edit_staff(StaffEditCmd::new(roster[0].id, "alice").position("manager"))
        .await
        .unwrap();
    assert_eq!(roster[0].position.as_deref(), Some("manager"));
    assert!(!roster[0].active);
}

#[tokio::test]
async fn removing_a_member_returns_the_remaining_roster() {
    let (engine, _db) = engine_with_db().await;
    let store = engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();
    let roster = engine
        .new_staff(store.id, "Bob", None, "alice")
        .await
        .unwrap();
    engine
        .new_staff(store.id, "Carol", None, "alice")
        .await
        .unwrap();

    let roster = engine.remove_staff(roster[0].id, "alice").await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Carol");
}

#[tokio::test]
async fn unknown_staff_member_is_reported_as_missing() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();

    let err = engine
        .remove_staff(uuid::Uuid::new_v4(), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::StaffNotFound(_)));
}

#[tokio::test]
async fn loan_lifecycle_issue_repay_settle_reissue() {
    let (engine, _db) = engine_with_db().await;
    let store = engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();
    let roster = engine
        .new_staff(store.id, "Bob", None, "alice")
        .await
        .unwrap();
    let staff_id = roster[0].id;

    let roster = engine
        .issue_loan(staff_id, MoneyCents::new(10_000), Some("till float"), "alice")
        .await
        .unwrap();
    let loan = roster[0].loan.as_ref().unwrap();
    assert_eq!(loan.amount, MoneyCents::new(10_000));
    assert_eq!(loan.repaid, MoneyCents::ZERO);
    assert_eq!(loan.status, LoanStatus::Active);
    assert_eq!(loan.due_date, loan.date_issued + chrono::Days::new(30));
    assert_eq!(loan.notes.as_deref(), Some("till float"));

    // Only one loan at a time.
    let err = engine
        .issue_loan(staff_id, MoneyCents::new(500), None, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    let roster = engine
        .record_loan_payment(staff_id, MoneyCents::new(4000), "alice")
        .await
        .unwrap();
    let loan = roster[0].loan.as_ref().unwrap();
    assert_eq!(loan.repaid, MoneyCents::new(4000));
    assert_eq!(loan.status, LoanStatus::Active);
    assert_eq!(loan.outstanding(), MoneyCents::new(6000));

    let roster = engine
        .record_loan_payment(staff_id, MoneyCents::new(6000), "alice")
        .await
        .unwrap();
    let loan = roster[0].loan.as_ref().unwrap();
    assert_eq!(loan.status, LoanStatus::Paid);

    // A settled loan no longer accepts payments, but a new one may replace it.
    let err = engine
        .record_loan_payment(staff_id, MoneyCents::new(1), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    let roster = engine
        .issue_loan(staff_id, MoneyCents::new(2000), None, "alice")
        .await
        .unwrap();
    let loan = roster[0].loan.as_ref().unwrap();
    assert_eq!(loan.amount, MoneyCents::new(2000));
    assert_eq!(loan.repaid, MoneyCents::ZERO);
    assert_eq!(loan.status, LoanStatus::Active);
}

#[tokio::test]
async fn non_positive_loan_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let store = engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();
    let roster = engine
        .new_staff(store.id, "Bob", None, "alice")
        .await
        .unwrap();
    let staff_id = roster[0].id;

    let err = engine
        .issue_loan(staff_id, MoneyCents::new(0), None, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    engine
        .issue_loan(staff_id, MoneyCents::new(1000), None, "alice")
        .await
        .unwrap();
    let err = engine
        .record_loan_payment(staff_id, MoneyCents::new(-50), "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[tokio::test]
async fn deleting_a_store_drops_its_roster() {
    let (engine, db) = engine_with_db().await;
    let store = engine
        .new_store("Arcade", "1 Main St", None, "alice")
        .await
        .unwrap();
    engine
        .new_staff(store.id, "Bob", None, "alice")
        .await
        .unwrap();

    engine.delete_store(store.id, "alice").await.unwrap();

    let backend = db.get_database_backend();
    let remaining = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS n FROM staff_members".to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    let n: i64 = remaining.try_get("", "n").unwrap();
    assert_eq!(n, 0);
}
