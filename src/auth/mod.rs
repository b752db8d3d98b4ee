pub mod cookies;
pub mod extractor;
