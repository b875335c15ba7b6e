// Presentation coordinator for the restaurant wheel.

pub mod app;
pub mod protocol;
