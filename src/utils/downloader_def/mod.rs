pub mod downloader;
pub mod extract;
pub mod providers;
pub mod r#trait;
