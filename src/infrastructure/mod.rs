pub mod file_importer;
