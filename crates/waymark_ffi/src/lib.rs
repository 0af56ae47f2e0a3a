//! Flutter-facing bridge crate for Waymark core.
//! Bridge glue is generated from [`api`]; keep everything else in
//! `waymark_core`.

pub mod api;
