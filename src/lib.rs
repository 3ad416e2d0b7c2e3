//! Contest Payouts - split a prize pool between audit contest participants
//!
//! Computes how a fixed prize pool is shared between everyone who reported
//! valid findings in a bug-bounty style audit contest. Findings are fetched
//! from the contest provider, deduplicated into unique confirmed
//! vulnerabilities, and converted into per-user dollar payouts.
//!
//! # How it works
//!
//! 1. Confirmed findings become unique vulnerabilities; duplicate reports
//!    resolve against them by id
//! 2. Every unique user who reported a vulnerability (original or valid
//!    duplicate) joins its submitter set
//! 3. The vulnerability's base point value (by severity) is split across
//!    the set: a single finder keeps the full value, `n` finders each earn
//!    `base * 0.9^(n-1) / n`
//! 4. The prize pool is distributed proportionally to accumulated points
//!
//! # Fairness rules
//!
//! - A user is credited at most once per vulnerability, however many
//!   records they filed for it
//! - A duplicate inherits the confirmed original's severity, never its own
//! - Duplicates of unconfirmed or non-payable findings earn nothing
//! - Heavily-duplicated findings consume less of the pool than rare ones

pub mod cantina;
pub mod config;
pub mod findings;
pub mod grouping;
pub mod payout;
pub mod scoring;

pub use cantina::{CantinaClient, ProviderError};
pub use config::Config;
pub use payout::{compute_payouts, ContestOutcome, ContestReport, PayoutTable};
pub use scoring::{scaled_points, PointsTable};
