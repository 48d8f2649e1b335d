//! Routing shell and localization bootstrap for a DEX front end.

pub mod bootstrap;
pub mod config;
pub mod crowdin;
pub mod i18n;
pub mod preferences;
pub mod routes;
pub mod security;
pub mod server;
