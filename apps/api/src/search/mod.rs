// Job search engine: fuzzy text matching plus exact-field and range filters
// over an in-memory snapshot of the catalogue. Pure and synchronous except for
// `filter::search_jobs`, which fetches the snapshot from the store.

pub mod criteria;
pub mod distance;
pub mod filter;
pub mod fuzzy;
pub mod handlers;
pub mod salary;
pub mod tokenizer;
