//! bookline-bookctl: command-line bookkeeping over a file-backed bookline ledger.
//!
//! Records events, scores, quotes and wagers, settles finalized events with
//! runner commissions, and reports scenario exposure against risk limits.
//! Every state-changing command appends to a JSONL audit trail.

pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
