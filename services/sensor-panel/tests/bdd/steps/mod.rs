//! BDD step definitions for the sensor panel service

pub mod polling_steps;
pub mod sorting_steps;
