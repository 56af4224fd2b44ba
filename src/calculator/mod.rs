//! Payment Calculator Module
//!
//! Derives yearly, monthly and weekly payments for a fixed-rate amortizing
//! loan compounded annually. Monthly and weekly figures are even splits of
//! the yearly installment.

mod calculator;


pub use calculator::{calculate, MONTHS_PER_YEAR, WEEKS_PER_YEAR};
