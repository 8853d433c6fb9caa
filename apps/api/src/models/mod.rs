pub mod brand_voice;
pub mod catalog;
pub mod generation;
pub mod library;
pub mod platform;
pub mod variant;
