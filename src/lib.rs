//! Trigon Domain Manager
//!
//! Connects a wallet, keeps it on the Trigon chain, mints `.trigon`
//! domains, edits their records and lists everything registered.

pub mod app;
pub mod config;
pub mod error;
pub mod menu;
pub mod notice;
pub mod registry;
pub mod routes;
pub mod state;
pub mod view;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use app::{DomainManager, WalletConnection};
pub use config::Config;
pub use notice::{Notice, NoticeBoard, Notifier};
pub use view::View;
