//! Integration tests for rowbind with a MySQL testcontainer
//!
//! These tests verify the full stack: named binding of composite values,
//! constructor-based row mapping, batches and settings, using a real MySQL
//! database.
//!
//! A single container is shared across all tests using the `ctor` pattern.
//! Tests run sequentially with `serial_test` and clean up tables between runs.
//!
//! Container cleanup:
//! - The `watchdog` feature handles cleanup on CTRL+C or SIGTERM signals
//! - For normal process exit, we use `shutdown_hooks` to signal the container thread to stop
//! - The container lives inside the thread, so it's dropped when the thread exits

mod common;

use common::*;
use ctor::ctor;
use rowbind::{
    Error, MySqlHandle, MySqlHandleBuilder, Settings, SqlUpdate, UnnamedParameterPolicy,
};
use serial_test::serial;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;

const SCHEMA: &[&str] = &[
    "create table something (id integer primary key, name varchar(100))",
    "create table customer (name varchar(100) primary key, street varchar(100) null, zip varchar(10) null)",
    "create table event (id integer primary key, happened_on date not null, starts_at time not null, \
     recorded_at datetime not null, amount decimal(10, 2) not null, details json null)",
];

const ALL_TABLES: &[&str] = &["something", "customer", "event"];

const INSERT_THING: &str = "insert into something (id, name) values (:something.id, :something.name)";

// Holds the connection URL (container lives in the thread)
static DB_URL: OnceLock<String> = OnceLock::new();
// Flag to signal the container thread to exit
static SHUTDOWN: AtomicBool = AtomicBool::new(false);
// Thread handle for joining on exit
static CONTAINER_THREAD: OnceLock<JoinHandle<()>> = OnceLock::new();

/// Cleanup function called on process exit.
/// Signals the container thread to stop and waits for it to finish.
extern "C" fn cleanup_on_exit() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    std::thread::sleep(std::time::Duration::from_millis(500));
}

#[ctor]
fn setup_container() {
    use std::time::Duration;

    shutdown_hooks::add_shutdown_hook(cleanup_on_exit);

    let (ready_tx, ready_rx) = std::sync::mpsc::channel();

    // The container lives inside this thread, so it will be dropped when the thread exits.
    let handle = thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let container: ContainerAsync<Mysql> = Mysql::default().start().await.unwrap();
            let port = container.get_host_port_ipv4(3306).await.unwrap();
            let url = format!("mysql://root@127.0.0.1:{}/test", port);

            let handle = MySqlHandle::new(&url).unwrap();
            for stmt in SCHEMA {
                handle.update(*stmt).execute(&handle).await.unwrap();
            }

            ready_tx.send(url).unwrap();

            while !SHUTDOWN.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        });
    });

    let _ = CONTAINER_THREAD.set(handle);

    let url = ready_rx.recv().unwrap();
    DB_URL.set(url).unwrap();
}

fn get_db_url() -> &'static str {
    DB_URL.get().expect("Container not initialized")
}

fn settings() -> Settings {
    let mut settings = Settings::with_url(get_db_url());
    settings.log_level = Some("rowbind=debug".to_string());
    settings
}

async fn connect() -> MySqlHandle {
    let settings = settings();
    init_tracing(&settings);
    let handle = MySqlHandle::from_settings(&settings).unwrap();
    for table in ALL_TABLES {
        handle
            .update(format!("delete from `{}`", table))
            .execute(&handle)
            .await
            .unwrap();
    }
    handle
}

async fn insert(handle: &MySqlHandle, thing: &Thing) -> rowbind::Result<u64> {
    let result = handle
        .update(INSERT_THING)
        .bind("something", thing)
        .execute(handle)
        .await?;
    Ok(result.rows_affected)
}

async fn list(handle: &MySqlHandle) -> rowbind::Result<Vec<Thing>> {
    handle
        .query("select id, name from something order by id")
        .fetch_all(handle)
        .await
}

async fn find_by_id(handle: &MySqlHandle, id: i32) -> rowbind::Result<Option<Thing>> {
    handle
        .query("select id, name from something where id = :id")
        .bind("id", &id)
        .fetch_optional(handle)
        .await
}

// ============ Binding and mapping ============

#[tokio::test]
#[serial]
async fn test_insert_list_and_find() {
    let handle = connect().await;

    let brian = Thing::new(1, "Brian");
    let keith = Thing::new(2, "Keith");
    assert_eq!(insert(&handle, &brian).await.unwrap(), 1);
    assert_eq!(insert(&handle, &keith).await.unwrap(), 1);

    let rows = list(&handle).await.unwrap();
    assert_eq!(rows, vec![brian, keith.clone()]);

    assert_eq!(find_by_id(&handle, 2).await.unwrap(), Some(keith));
    assert_eq!(find_by_id(&handle, 3).await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn test_nullable_and_defaulted_columns() {
    let handle = connect().await;
    insert(&handle, &Thing::new(1, "Brian")).await.unwrap();

    let mapped: NullableThing = handle
        .query(
            "select id, name, null as nullable, null as nullableDefaultedNull, \
             null as nullableDefaultedNotNull, 'test' as defaulted from something",
        )
        .fetch_one(&handle)
        .await
        .unwrap();

    assert_eq!(
        mapped,
        NullableThing {
            id: 1,
            name: "Brian".to_string(),
            nullable: None,
            nullable_defaulted_null: None,
            nullable_defaulted_not_null: None,
            defaulted: "test".to_string(),
        }
    );

    let without_defaulted: NullableThing = handle
        .query("select id, name from something")
        .fetch_one(&handle)
        .await
        .unwrap();
    assert_eq!(without_defaulted.defaulted, "default value");
    assert_eq!(without_defaulted.nullable_defaulted_not_null, None);
}

#[tokio::test]
#[serial]
async fn test_labels_match_ignoring_case() {
    let handle = connect().await;
    insert(&handle, &Thing::new(7, "Carl")).await.unwrap();

    let thing: Thing = handle
        .query("select id as ID, name as Name from something")
        .fetch_one(&handle)
        .await
        .unwrap();
    assert_eq!(thing, Thing::new(7, "Carl"));
}

#[tokio::test]
#[serial]
async fn test_null_intermediate_component() {
    let handle = connect().await;

    let customers = [
        Customer {
            name: "Brian".into(),
            address: Some(Address {
                street: "Main St".into(),
                zip: Some("12345".into()),
            }),
            notes: Vec::new(),
        },
        Customer {
            name: "Keith".into(),
            address: None,
            notes: Vec::new(),
        },
    ];
    for customer in &customers {
        handle
            .update("insert into customer (name, street, zip) values (:c.name, :c.address.street, :c.address.zip)")
            .bind("c", customer)
            .execute(&handle)
            .await
            .unwrap();
    }

    let rows: Vec<CustomerRow> = handle
        .query("select name, street, zip from customer order by name")
        .fetch_all(&handle)
        .await
        .unwrap();
    assert_eq!(
        rows,
        vec![
            CustomerRow {
                name: "Brian".into(),
                street: Some("Main St".into()),
                zip: Some("12345".into()),
            },
            CustomerRow {
                name: "Keith".into(),
                street: None,
                zip: None,
            },
        ]
    );
}

#[tokio::test]
#[serial]
async fn test_missing_column_is_missing_argument() {
    let handle = connect().await;
    insert(&handle, &Thing::new(1, "Brian")).await.unwrap();

    let err = handle
        .query("select id from something")
        .fetch_all::<Thing, _>(&handle)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingArgument { target: "Thing", .. }));
}

#[tokio::test]
#[serial]
async fn test_temporal_decimal_and_json_columns() {
    let handle = connect().await;

    let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let time = chrono::NaiveTime::from_hms_opt(14, 30, 45).unwrap();
    let events = [
        Event {
            id: 1,
            happened_on: date,
            starts_at: time,
            recorded_at: date.and_time(time),
            amount: rust_decimal::Decimal::new(12345, 2),
            details: Some(serde_json::json!({"key": "value"})),
        },
        Event {
            id: 2,
            happened_on: date,
            starts_at: chrono::NaiveTime::MIN,
            recorded_at: date.and_time(chrono::NaiveTime::MIN),
            amount: rust_decimal::Decimal::ZERO,
            details: None,
        },
    ];
    for event in &events {
        handle
            .update(
                "insert into event (id, happened_on, starts_at, recorded_at, amount, details) \
                 values (:e.id, :e.happened_on, :e.starts_at, :e.recorded_at, :e.amount, :e.details)",
            )
            .bind("e", event)
            .execute(&handle)
            .await
            .unwrap();
    }

    let rows: Vec<Event> = handle
        .query("select * from event order by id")
        .fetch_all(&handle)
        .await
        .unwrap();
    assert_eq!(rows, events);
}

// ============ Batches ============

#[tokio::test]
#[serial]
async fn test_batch_insert() {
    let handle = connect().await;

    let things = vec![
        Thing::new(1, "Brian"),
        Thing::new(2, "Keith"),
        Thing::new(3, "Carl"),
    ];
    let result = handle
        .batch(INSERT_THING)
        .bind_batch("something", &things)
        .execute(&handle)
        .await
        .unwrap();
    assert_eq!(result.rows_affected, 3);

    let count: i64 = handle
        .query("select count(*) from something")
        .fetch_scalar(&handle)
        .await
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(list(&handle).await.unwrap(), things);
}

#[tokio::test]
#[serial]
async fn test_empty_batch_is_a_no_op() {
    let handle = connect().await;
    let none: Vec<Thing> = Vec::new();
    let result = handle
        .batch(INSERT_THING)
        .bind_batch("something", &none)
        .execute(&handle)
        .await
        .unwrap();
    assert_eq!(result.rows_affected, 0);
}

// ============ Unnamed parameters ============

#[tokio::test]
#[serial]
async fn test_unnamed_parameter_rejected_by_default() {
    let handle = connect().await;

    let err = handle
        .update("insert into something (id, name) values (?, ?)")
        .bind_unnamed(&1i32)
        .bind_unnamed("Brian")
        .execute(&handle)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Naming(0)));
    assert!(list(&handle).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_positional_policy() {
    let cleaned = connect().await;

    let handle = MySqlHandleBuilder::new(get_db_url())
        .unnamed_parameters(UnnamedParameterPolicy::Positional)
        .pool_min(1)
        .pool_max(4)
        .build()
        .unwrap();
    assert_eq!(handle.policy(), UnnamedParameterPolicy::Positional);

    handle
        .update("insert into something (id, name) values (?, ?)")
        .bind_unnamed(&3i32)
        .bind_unnamed("Carl")
        .execute(&handle)
        .await
        .unwrap();

    let thing: Thing = handle
        .query("select id, name from something where id = ?")
        .bind_unnamed(&3i32)
        .fetch_one(&handle)
        .await
        .unwrap();
    assert_eq!(thing, Thing::new(3, "Carl"));

    // handles built separately share nothing but the database
    assert_eq!(cleaned.descriptors().len(), 0);
    assert_eq!(handle.descriptors().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_statement_without_handle_policy() {
    let handle = connect().await;
    SqlUpdate::with_policy(
        "insert into something (id, name) values (?, :name)",
        UnnamedParameterPolicy::Positional,
    )
    .bind_unnamed(&9i32)
    .bind("name", "Nina")
    .execute(&handle)
    .await
    .unwrap();

    assert_eq!(
        find_by_id(&handle, 9).await.unwrap(),
        Some(Thing::new(9, "Nina"))
    );
}
