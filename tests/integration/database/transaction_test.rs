//! Transaction manager tests
//!
//! Commit, rollback on failure, exactly-once release.

use assert_matches::assert_matches;
use serial_test::serial;
use sqlx::Row;

use gymbook::backend::db::{DatabaseError, DatabaseHealth, SqlParam, TransactionalClient};

use crate::common::TestDatabase;

const INSERT_USER: &str = "INSERT INTO users (id, email, password_hash, first_name, last_name) \
     VALUES (gen_random_uuid(), $1, 'hash', 'Ada', 'Lovelace')";

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_health_check_reports_server_time() {
    let fixture = TestDatabase::new().await;
    assert_matches!(
        fixture.db().check_health().await,
        DatabaseHealth::Reachable { .. }
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_query_binds_parameters() {
    let fixture = TestDatabase::new().await;
    let result = assert_ok!(
        fixture
            .db()
            .query(
                "SELECT $1::bigint + 1 AS next, $2::text AS label, $3::text IS NULL AS missing",
                &[SqlParam::from(41i64), SqlParam::from("gym"), SqlParam::Null],
            )
            .await
    );

    assert_eq!(result.row_count, 1);
    let row = result.first().unwrap();
    assert_eq!(row.get::<i64, _>("next"), 42);
    assert_eq!(row.get::<String, _>("label"), "gym");
    assert!(row.get::<bool, _>("missing"));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_committed_work_is_visible() {
    let fixture = TestDatabase::new().await;
    let db = fixture.db();

    let inserted: u64 = db
        .run_transaction(|client: &mut TransactionalClient| {
            Box::pin(async move {
                let result = client.query(INSERT_USER, &[SqlParam::from("a@x.com")]).await?;
                Ok::<_, DatabaseError>(result.row_count)
            })
        })
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(fixture.count_users("a@x.com").await, 1);
    assert_eq!(db.leased_clients(), 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_failed_work_rolls_back_and_releases() {
    let fixture = TestDatabase::new().await;
    let db = fixture.db();

    let result: Result<(), DatabaseError> = db
        .run_transaction(|client: &mut TransactionalClient| {
            Box::pin(async move {
                client.query(INSERT_USER, &[SqlParam::from("a@x.com")]).await?;
                Err(DatabaseError::Unreachable("simulated failure".to_string()))
            })
        })
        .await;

    assert_matches!(result, Err(DatabaseError::Unreachable(message)) if message == "simulated failure");
    assert_eq!(fixture.count_users("a@x.com").await, 0);
    assert_eq!(db.leased_clients(), 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_failed_statement_rolls_back_earlier_statements() {
    let fixture = TestDatabase::new().await;
    let db = fixture.db();

    let result: Result<(), DatabaseError> = db
        .run_transaction(|client: &mut TransactionalClient| {
            Box::pin(async move {
                client.query(INSERT_USER, &[SqlParam::from("a@x.com")]).await?;
                // Same email again violates the unique constraint
                client.query(INSERT_USER, &[SqlParam::from("a@x.com")]).await?;
                Ok(())
            })
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_unique_violation());
    assert_eq!(fixture.count_users("a@x.com").await, 0);
    assert_eq!(db.leased_clients(), 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_release_is_idempotent() {
    let fixture = TestDatabase::new().await;
    let db = fixture.db();
    let idle_before = db.pool().num_idle();

    let mut client = db.lease().await.unwrap();
    client.query("SELECT 1", &[]).await.unwrap();
    assert_eq!(client.last_query().as_deref(), Some("SELECT 1"));
    assert_eq!(db.leased_clients(), 1);

    client.release();
    client.release();
    assert!(client.is_released());
    assert_eq!(db.leased_clients(), 0);
    assert_err!(client.query("SELECT 1", &[]).await, DatabaseError::Released);

    drop(client);
    assert_eq!(db.leased_clients(), 0);
    // The connection went back once, not twice
    tokio::task::yield_now().await;
    assert!(db.pool().num_idle() <= idle_before + 1);
    assert!(db.pool().size() <= 5);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_dropping_open_transaction_discards_it() {
    let fixture = TestDatabase::new().await;
    let db = fixture.db();

    {
        let mut client = db.lease().await.unwrap();
        client.begin().await.unwrap();
        client
            .query(INSERT_USER, &[SqlParam::from("a@x.com")])
            .await
            .unwrap();
        assert!(client.in_transaction());
    }

    assert_eq!(db.leased_clients(), 0);
    assert_eq!(fixture.count_users("a@x.com").await, 0);
}
