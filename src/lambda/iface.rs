use crate::{
    models::{layer_arn::LayerArn, layer_info::LayerInfo},
    utils::errors::FetchError,
};

/// A Lambda control-plane client bound to one region.
pub trait LayerClient {
    /// Point lookup of a single layer version; exactly one remote call.
    fn get_layer_version_by_arn(&self, arn: &LayerArn) -> Result<LayerInfo, FetchError>;
}

/// Builds region-scoped clients. Injected so lookups can run against fakes.
pub trait LayerClientFactory {
    fn client_for_region(&self, region: &str) -> Result<Box<dyn LayerClient + '_>, FetchError>;
}

impl<T: LayerClientFactory + ?Sized> LayerClientFactory for &T {
    fn client_for_region(&self, region: &str) -> Result<Box<dyn LayerClient + '_>, FetchError> {
        (**self).client_for_region(region)
    }
}
