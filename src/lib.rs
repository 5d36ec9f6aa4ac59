pub mod dashboard;
pub mod engine;
pub mod error;
pub mod mastery;
pub mod model;
pub mod schedule;
pub mod store;
pub mod weak;
pub mod web;
