//! Listings domain - rewriting and enriching job listings.

pub mod batch;
pub mod extraction;
pub mod identifiers;
pub mod models;
pub mod pipeline;
pub mod quality;
pub mod rewrite;
