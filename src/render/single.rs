use std::io::Write;

use url::Url;

use crate::{
    models::{layer_arn::LayerArn, layer_info::LayerInfo},
    utils::{
        errors::{FormatError, RenderError},
        string::StringUtils,
    },
};

/// Prints the details of one layer version, one labelled line per field.
///
/// The location line comes last: if the signed URL cannot be parsed, the other
/// fields have already been written when the error is returned.
pub fn render_single(
    out: &mut impl Write,
    arn: &LayerArn,
    info: &LayerInfo,
) -> Result<(), RenderError> {
    writeln!(out, "Name: {}", arn.name)?;
    writeln!(out, "Version: {}", info.version)?;
    writeln!(out, "Description: {}", info.description)?;
    writeln!(out, "Created on: {}", info.created_date)?;
    writeln!(
        out,
        "Size: {} kB",
        StringUtils::group_thousands(info.size_kb())
    )?;

    let location = display_location(&info.location)?;
    writeln!(out, "Location: {location}")?;
    Ok(())
}

/// Strips a signed URL down to `scheme://host/path?versionId=<id>`, dropping
/// the credentials carried in the other query parameters.
///
/// The path is printed as the URL parser normalizes it: percent-encoding is
/// kept and an empty path becomes `/`.
pub fn display_location(location: &str) -> Result<String, FormatError> {
    let url = Url::parse(location).map_err(|source| FormatError {
        location: location.to_owned(),
        source,
    })?;

    let version_id = url
        .query_pairs()
        .find(|(key, _)| key == "versionId")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_owned(),
        (None, _) => String::new(),
    };

    Ok(format!(
        "{}://{}{}?versionId={}",
        url.scheme(),
        host,
        url.path(),
        version_id
    ))
}
