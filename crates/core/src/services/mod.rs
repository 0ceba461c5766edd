pub mod analytics_service;
pub mod chart_service;
pub mod page_service;
pub mod price_service;
