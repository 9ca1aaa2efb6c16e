//! Fika place listings: search, filtering and paging over place records,
//! plus a cached client for the fika REST API.

pub mod api;
pub mod config;
pub mod demo;
pub mod display;
pub mod models;
pub mod search;
