/// Metadata of a single layer version as returned by the Lambda API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub version: u64,
    pub description: String,
    /// Creation timestamp, kept verbatim as the API formats it.
    pub created_date: String,
    pub code_size: u64,
    /// Pre-signed download URL of the layer ZIP.
    pub location: String,
}

impl LayerInfo {
    /// Content size in whole kilobytes.
    pub fn size_kb(&self) -> u64 {
        self.code_size / 1024
    }
}
