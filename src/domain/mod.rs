// Domain layer - Plain data models and value rules
pub mod calendar;
pub mod catalog;
pub mod dosing;
pub mod equipment;
pub mod error;
pub mod event;
pub mod icp;
pub mod livestock;
pub mod time_range;
pub mod timeline;
