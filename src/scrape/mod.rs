//! Passive web scraping: page fetching, address extraction, link discovery.

pub mod extractor;
pub mod fetcher;
pub mod links;
