pub mod dir;
pub mod downloader_def;
pub mod errors;
pub mod logger;
pub mod progress;
pub mod string;
pub mod variables;
