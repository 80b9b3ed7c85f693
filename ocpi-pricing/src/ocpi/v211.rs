/// The Charge Detail Record object, convertible into its 2.2.1 counterpart.
pub mod cdr;

/// The Tariff object, convertible into its 2.2.1 counterpart.
pub mod tariff;
