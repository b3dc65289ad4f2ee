use aws_config::BehaviorVersion;
use aws_sdk_lambda::{
    Client,
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata as _, SdkError},
    operation::get_layer_version_by_arn::{GetLayerVersionByArnError, GetLayerVersionByArnOutput},
};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::{
    lambda::iface::{LayerClient, LayerClientFactory},
    models::{config::AwsSettings, layer_arn::LayerArn, layer_info::LayerInfo},
    utils::errors::{FetchError, ResultTrait as _, ResultWithError},
};

/// Creates Lambda SDK clients from the default credential chain. The SDK is
/// async, so every call is driven to completion on a private runtime.
pub struct AwsLambdaClientFactory {
    runtime: Runtime,
    settings: AwsSettings,
}

impl AwsLambdaClientFactory {
    pub fn new(settings: AwsSettings) -> ResultWithError<Self> {
        let runtime = Runtime::new().auto_err("Failed to create runtime")?;
        Ok(Self { runtime, settings })
    }
}

impl LayerClientFactory for AwsLambdaClientFactory {
    fn client_for_region(&self, region: &str) -> Result<Box<dyn LayerClient + '_>, FetchError> {
        debug!("Loading AWS configuration for region {}", region);

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_owned()));
        if let Some(profile) = &self.settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &self.settings.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let config = self.runtime.block_on(loader.load());

        Ok(Box::new(AwsLambdaClient {
            client: Client::new(&config),
            runtime: &self.runtime,
        }))
    }
}

pub struct AwsLambdaClient<'a> {
    client: Client,
    runtime: &'a Runtime,
}

impl LayerClient for AwsLambdaClient<'_> {
    fn get_layer_version_by_arn(&self, arn: &LayerArn) -> Result<LayerInfo, FetchError> {
        let arn = arn.to_string();
        debug!("GetLayerVersionByArn {}", arn);

        let output = self
            .runtime
            .block_on(self.client.get_layer_version_by_arn().arn(&arn).send())
            .map_err(|err| classify_error(&arn, err))?;

        layer_info_from_output(output)
    }
}

fn classify_error(arn: &str, err: SdkError<GetLayerVersionByArnError>) -> FetchError {
    match err {
        SdkError::ServiceError(ctx) => match ctx.into_err() {
            GetLayerVersionByArnError::ResourceNotFoundException(_) => FetchError::NotFound {
                arn: arn.to_owned(),
            },
            other if other.code() == Some("AccessDeniedException") => FetchError::AccessDenied {
                arn: arn.to_owned(),
                message: other.message().unwrap_or_default().to_owned(),
            },
            other => FetchError::Service(DisplayErrorContext(&other).to_string()),
        },
        other => FetchError::Transport(DisplayErrorContext(&other).to_string()),
    }
}

fn layer_info_from_output(output: GetLayerVersionByArnOutput) -> Result<LayerInfo, FetchError> {
    let version = u64::try_from(output.version())
        .ok()
        .filter(|version| *version >= 1)
        .ok_or(FetchError::MalformedResponse { field: "Version" })?;
    let created_date = output
        .created_date()
        .ok_or(FetchError::MalformedResponse {
            field: "CreatedDate",
        })?
        .to_owned();
    let content = output
        .content()
        .ok_or(FetchError::MalformedResponse { field: "Content" })?;
    let location = content
        .location()
        .ok_or(FetchError::MalformedResponse {
            field: "Content.Location",
        })?
        .to_owned();
    let code_size =
        u64::try_from(content.code_size()).map_err(|_| FetchError::MalformedResponse {
            field: "Content.CodeSize",
        })?;

    Ok(LayerInfo {
        version,
        description: output.description().unwrap_or_default().to_owned(),
        created_date,
        code_size,
        location,
    })
}
