pub mod importer;
pub mod item_cache;
