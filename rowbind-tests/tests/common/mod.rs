//! Models and helpers shared by the test binaries

#![allow(dead_code)]

use rowbind::{Composite, Record, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Record, Composite)]
pub struct Thing {
    pub id: i32,
    pub name: String,
}

impl Thing {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Record)]
#[rowbind(rename_all = "camelCase")]
pub struct NullableThing {
    pub id: i32,
    pub name: String,
    pub nullable: Option<String>,
    #[rowbind(default)]
    pub nullable_defaulted_null: Option<String>,
    #[rowbind(default = "not_null")]
    pub nullable_defaulted_not_null: Option<String>,
    #[rowbind(default = "default_value")]
    pub defaulted: String,
}

fn not_null() -> Option<String> {
    Some("not null".to_string())
}

fn default_value() -> String {
    "default value".to_string()
}

#[derive(Debug, Clone, PartialEq, Composite)]
pub struct Address {
    pub street: String,
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Composite)]
pub struct Customer {
    pub name: String,
    pub address: Option<Address>,
    #[rowbind(skip)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct CustomerRow {
    pub name: String,
    pub street: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Record)]
#[rowbind(validate = "Payment::check")]
pub struct Payment {
    #[rowbind(rename = "payment_id")]
    pub id: i64,
    pub amount: rust_decimal::Decimal,
    #[rowbind(skip)]
    pub memo: String,
}

impl Payment {
    fn check(&self) -> Result<(), String> {
        if self.amount.is_sign_negative() {
            return Err(format!("payment {} has a negative amount", self.id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Record, Composite)]
pub struct Event {
    pub id: i32,
    pub happened_on: chrono::NaiveDate,
    pub starts_at: chrono::NaiveTime,
    pub recorded_at: chrono::NaiveDateTime,
    pub amount: rust_decimal::Decimal,
    pub details: Option<serde_json::Value>,
}

/// Install a test subscriber once; `RUST_LOG` wins over the settings level.
pub fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(settings.log_level.as_deref().unwrap_or("warn"))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
