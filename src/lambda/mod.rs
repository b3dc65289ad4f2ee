pub mod client;
#[cfg(test)]
pub mod fake;
pub mod fetcher;
pub mod iface;
