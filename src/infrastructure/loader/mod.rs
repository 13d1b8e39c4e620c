pub mod csv_directory_loader;

pub use csv_directory_loader::CsvDirectoryLoader;
