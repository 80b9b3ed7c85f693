/// The Charge Detail Record object.
pub mod cdr;

/// The Tariff object.
pub mod tariff;
