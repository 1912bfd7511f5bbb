//! BDD step definitions for oilwatch service

pub mod polling_steps;
