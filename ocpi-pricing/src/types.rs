/// Electrical quantities such as energy and power.
pub mod electricity;

/// Monetary amounts, prices and VAT.
pub mod money;

pub(crate) mod number;

/// Durations, local times and dates.
pub mod time;
