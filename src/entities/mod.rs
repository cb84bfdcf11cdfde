pub mod business_settings;
pub mod cost_standard;
pub mod menu_item;
pub mod menu_pricing;
pub mod overhead_config;
pub mod production_log;
pub mod production_log_detail;
pub mod raw_material;
pub mod recipe_detail;
pub mod supplier;
pub mod variance_record;
pub mod yield_test;
