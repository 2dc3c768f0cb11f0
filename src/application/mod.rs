// Application layer - Pure transformations and the use cases built on them
pub mod analysis_service;
pub mod dosing_repository;
pub mod dosing_service;
pub mod equipment_service;
pub mod event_overlay;
pub mod icp_service;
pub mod livestock_service;
pub mod registry_repository;
pub mod series_normalizer;
pub mod series_selector;
pub mod timeline_layout;
