pub mod charts;
pub mod health;
