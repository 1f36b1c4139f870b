// src/lib.rs

//! stockwatch library: poll an inventory feed and alert once per new listing.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
