// Adapters layer: concrete catalog sources and ingredient-list readers.

pub mod decode;
pub mod file;
pub mod http;
pub mod ingredients;

pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;
