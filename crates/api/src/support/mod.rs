#![forbid(unsafe_code)]

pub(crate) mod args;
pub(crate) mod envelope;
pub(crate) mod time;
