pub mod collector;
pub mod rules;
pub mod tracker;
