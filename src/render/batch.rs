use std::io::Write;

use tracing::debug;

use crate::{
    lambda::{fetcher::LayerFetcher, iface::LayerClientFactory},
    render::table::TableWriter,
    utils::{errors::BatchError, string::StringUtils},
};

const HEADER: [&str; 5] = ["NAME", "VERSION", "DESCRIPTION", "CREATED ON", "SIZE (kB)"];
const PADDING: usize = 2;

/// Looks up every ARN, in order, and prints one aligned table.
///
/// The table is only written once all lookups succeeded; the first failure
/// aborts the batch and nothing reaches `out`.
pub fn render_batch<F, S>(
    out: &mut impl Write,
    fetcher: &LayerFetcher<F>,
    raw_ids: &[S],
) -> Result<usize, BatchError>
where
    F: LayerClientFactory,
    S: AsRef<str>,
{
    let mut table = TableWriter::new(PADDING);
    table.push_row(HEADER);

    for raw in raw_ids {
        let identifier = raw.as_ref().trim();
        let (arn, info) = fetcher
            .resolve(identifier)
            .map_err(|source| BatchError::Entry {
                identifier: identifier.to_owned(),
                source,
            })?;
        debug!("Resolved {}", identifier);

        let size = StringUtils::group_thousands(info.size_kb());
        table.push_row([
            arn.name,
            info.version.to_string(),
            info.description,
            info.created_date,
            size,
        ]);
    }

    out.write_all(table.render().as_bytes())?;
    out.flush()?;
    Ok(raw_ids.len())
}
