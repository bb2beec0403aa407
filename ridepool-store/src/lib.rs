pub mod app_config;
pub mod file_store;
pub mod json_file;
pub mod seed;

pub use app_config::Config;
pub use file_store::FileStore;
pub use json_file::JsonFile;
