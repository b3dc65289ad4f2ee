pub mod args;
pub mod config;
pub mod layer_arn;
pub mod layer_info;
