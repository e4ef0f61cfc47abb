//! Domain layer: process configuration and the dial-to-wheel translation rule.

pub mod config;
pub mod translate;
