//! # Flowlens Schedule
//!
//! Cron projection: turn a raw five-field cron expression into the next
//! concrete occurrence after a given instant. Parsing is forgiving in the
//! sense that an invalid expression is never an error — it simply yields
//! no occurrence, and the workflow gets no projected next run.

pub mod cron;

pub use cron::next_occurrence;
