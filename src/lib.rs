#![deny(clippy::unwrap_used)]

pub mod binder;
pub mod config;
pub mod control;
pub mod ingredient;
pub mod labelled;
pub mod prompt;
pub mod provider;
pub mod repair;
pub mod seo;
pub mod service;
pub mod template;
