pub mod chart_service;
pub mod transform;
