//! Business logic layer. Each service owns the read-compute-write cycle
//! for one aggregate and publishes events after successful writes.

pub mod cost_standards;
pub mod materials;
pub mod menu_items;
pub mod production;
pub mod recipes;
pub mod reports;
pub mod settings;
pub mod suppliers;
pub mod variance;
pub mod yield_tests;
