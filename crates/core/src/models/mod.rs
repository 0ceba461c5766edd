pub mod analytics;
pub mod chart;
pub mod coin;
pub mod price;
pub mod settings;
