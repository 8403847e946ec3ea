pub mod curation;
pub mod product;
pub mod profile;
