#![forbid(unsafe_code)]

pub mod calendar;
pub mod gapfill;
pub mod ids;
pub mod interval;
