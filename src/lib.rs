//! opaldb - record-search subsystem for a schema-driven record store
//!
//! Translates user-authored filter/sort field paths into SQL
//! identifiers, bound parameters and LEFT JOINs over dynamic,
//! user-defined collection schemas.

pub mod dao;
pub mod db;
pub mod models;
pub mod search;
pub mod tools;
