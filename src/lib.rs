// src/lib.rs

//! LeetCode Dump Library
//!
//! Scrapes a user's accepted submissions, keeps the best one per problem and
//! language in a local archive, and renders that archive into a static site.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
