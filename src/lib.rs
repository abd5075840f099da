//! Rent accounting for a small property portfolio: properties, unit
//! categories, units, tenants and payments, with arrears, rent roll,
//! vacancy and occupancy reporting on top.

pub mod stat;
