//! Concrete adapter implementations for ports.

pub mod console_notifier;
pub mod csv_adapter;
pub mod csv_ledger;
pub mod file_config_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_ledger;
pub mod telegram_notifier;
