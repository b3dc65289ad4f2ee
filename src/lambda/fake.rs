use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use crate::{
    lambda::iface::{LayerClient, LayerClientFactory},
    models::{layer_arn::LayerArn, layer_info::LayerInfo},
    utils::errors::FetchError,
};

/// In-memory stand-in for the Lambda API, keyed by ARN string.
#[derive(Default)]
pub struct FakeFactory {
    layers: HashMap<String, LayerInfo>,
    denied: Vec<String>,
    regions: RefCell<Vec<String>>,
    calls: Cell<usize>,
}

impl FakeFactory {
    pub fn with_layer(mut self, arn: &str, info: LayerInfo) -> Self {
        self.layers.insert(arn.to_owned(), info);
        self
    }

    pub fn with_denied(mut self, arn: &str) -> Self {
        self.denied.push(arn.to_owned());
        self
    }

    /// Regions clients were requested for, in order.
    pub fn regions(&self) -> Vec<String> {
        self.regions.borrow().clone()
    }

    /// Number of lookups issued.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl LayerClientFactory for FakeFactory {
    fn client_for_region(&self, region: &str) -> Result<Box<dyn LayerClient + '_>, FetchError> {
        self.regions.borrow_mut().push(region.to_owned());
        Ok(Box::new(FakeClient { factory: self }))
    }
}

struct FakeClient<'a> {
    factory: &'a FakeFactory,
}

impl LayerClient for FakeClient<'_> {
    fn get_layer_version_by_arn(&self, arn: &LayerArn) -> Result<LayerInfo, FetchError> {
        let factory = self.factory;
        factory.calls.set(factory.calls.get() + 1);

        let key = arn.to_string();
        if factory.denied.contains(&key) {
            return Err(FetchError::AccessDenied {
                arn: key,
                message: "not authorized".to_owned(),
            });
        }
        factory
            .layers
            .get(&key)
            .cloned()
            .ok_or(FetchError::NotFound { arn: key })
    }
}

pub fn sample_info(version: u64, code_size: u64) -> LayerInfo {
    LayerInfo {
        version,
        description: format!("layer v{version}"),
        created_date: "2024-03-01T10:00:00.000+0000".to_owned(),
        code_size,
        location: format!(
            "https://awslambda-eu-west-1-layers.s3.eu-west-1.amazonaws.com/snapshots/123456789012/deps-abc?versionId=ver{version}&X-Amz-Security-Token=tok&X-Amz-Signature=sig"
        ),
    }
}
