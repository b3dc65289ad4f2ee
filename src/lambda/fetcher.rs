use tracing::debug;

use crate::{
    lambda::iface::LayerClientFactory,
    models::{layer_arn::LayerArn, layer_info::LayerInfo},
    utils::errors::{FetchError, LookupError},
};

/// Looks up layer version metadata through region-scoped clients.
pub struct LayerFetcher<F: LayerClientFactory> {
    factory: F,
}

impl<F: LayerClientFactory> LayerFetcher<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn fetch(&self, arn: &LayerArn) -> Result<LayerInfo, FetchError> {
        let client = self.factory.client_for_region(&arn.region)?;
        let info = client.get_layer_version_by_arn(arn)?;
        debug!(
            "Layer {} version {}: {} bytes",
            arn.name, info.version, info.code_size
        );
        Ok(info)
    }

    /// Parses `raw` and fetches its metadata. Nothing is sent when the ARN is
    /// malformed.
    pub fn resolve(&self, raw: &str) -> Result<(LayerArn, LayerInfo), LookupError> {
        let arn: LayerArn = raw.parse()?;
        let info = self.fetch(&arn)?;
        Ok((arn, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lambda::fake::{FakeFactory, sample_info};

    const ARN: &str = "arn:aws:lambda:ap-southeast-2:123456789012:layer:deps:7";

    #[test]
    fn test_fetch_uses_arn_region() {
        let factory = FakeFactory::default().with_layer(ARN, sample_info(7, 4096));
        let fetcher = LayerFetcher::new(&factory);

        let (arn, info) = fetcher.resolve(ARN).unwrap();

        assert_eq!(arn.name, "deps");
        assert_eq!(info.version, 7);
        assert_eq!(factory.regions(), vec!["ap-southeast-2".to_owned()]);
        assert_eq!(factory.calls(), 1);
    }

    #[test]
    fn test_malformed_arn_makes_no_call() {
        let factory = FakeFactory::default();
        let fetcher = LayerFetcher::new(&factory);

        let err = fetcher.resolve("arn:aws:lambda:eu-west-1:layer").unwrap_err();

        assert!(matches!(err, LookupError::Parse(_)));
        assert_eq!(factory.calls(), 0);
        assert!(factory.regions().is_empty());
    }

    #[test]
    fn test_unknown_layer_is_not_found() {
        let factory = FakeFactory::default();
        let fetcher = LayerFetcher::new(&factory);

        let err = fetcher.resolve(ARN).unwrap_err();

        assert!(matches!(err, LookupError::Fetch(FetchError::NotFound { .. })));
        assert_eq!(factory.calls(), 1);
    }
}
