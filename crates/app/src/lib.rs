//! `stockroom-app`
//!
//! **Responsibility:** the tracker session that presentation code talks to.
//!
//! This crate provides:
//! - [`Tracker`]: owned state container; every user intent goes through it
//! - transient notifications for command outcomes
//! - environment-based configuration
//! - plain-text rendering of the stock table, counters and transaction log

pub mod config;
pub mod notification;
pub mod render;
pub mod tracker;

pub use config::AppConfig;
pub use notification::{Notification, NotificationLevel, Notifications};
pub use tracker::{NewItem, NewTransaction, Tab, Tracker};
