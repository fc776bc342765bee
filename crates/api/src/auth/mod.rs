//! Session token handling.

pub mod jwt;
