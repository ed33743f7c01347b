//! Bank domain: accounts, transfers and the negative-balance rule
//!
//! The operations in [`service`] are the units of work the transaction
//! retry layer wraps; everything else is persistence plumbing.

pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use db::{Database, starting_balance};
pub use error::BankError;
pub use models::{Account, AccountType};
pub use repository::AccountRepository;
pub use service::{BankService, ChaosDelay};
