use std::io::Write;

use tracing::{info, warn};

use crate::{
    lambda::{fetcher::LayerFetcher, iface::LayerClientFactory},
    models::{args::AppArgs, config::Config},
    render::{batch::render_batch, single::render_single},
    utils::{
        downloader_def::{downloader::ContentAcquirer, r#trait::ContentSource},
        errors::AppError,
    },
};

/// Main controller to run the application logic.
pub struct Run<F: LayerClientFactory, S: ContentSource> {
    args: AppArgs,
    fetcher: LayerFetcher<F>,
    acquirer: ContentAcquirer<S>,
}

impl<F: LayerClientFactory, S: ContentSource> Run<F, S> {
    pub fn new(args: AppArgs, config: &Config, factory: F, source: S) -> Self {
        Self {
            args,
            fetcher: LayerFetcher::new(factory),
            acquirer: ContentAcquirer::new(source, config.export.progress),
        }
    }

    /// Single-layer mode for one ARN, table mode for several.
    pub fn execute(&self, out: &mut impl Write) -> Result<(), AppError> {
        let identifiers = self.args.identifiers();

        match identifiers.as_slice() {
            [] => Err(AppError::MissingIdentifiers),
            [identifier] => self.run_single(out, identifier),
            many => {
                if let Some(export) = &self.args.export {
                    warn!(
                        "Ignoring export directory {:?}, content can only be exported for a single layer",
                        export
                    );
                }
                let rows = render_batch(out, &self.fetcher, many)?;
                info!("Rendered {} layers", rows);
                Ok(())
            }
        }
    }

    fn run_single(&self, out: &mut impl Write, raw: &str) -> Result<(), AppError> {
        let identifier = raw.trim();
        let (arn, info) =
            self.fetcher
                .resolve(identifier)
                .map_err(|source| AppError::Lookup {
                    identifier: identifier.to_owned(),
                    source,
                })?;

        render_single(out, &arn, &info)?;

        if let Some(export) = &self.args.export {
            info!("Exporting content of {} to {:?}", arn, export);
            let content_dir = self.acquirer.acquire(&info.location, export)?;
            writeln!(out, "Content exported to: {}", content_dir.display())?;
        }

        Ok(())
    }
}
