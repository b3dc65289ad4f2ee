use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "layer-inspect",
    version,
    about = "Inspect AWS Lambda layer versions and export their content.",
    long_about = r#"
layer-inspect looks up one or more Lambda layer versions by ARN and prints
their metadata.

With a single ARN, the name, version, description, creation date, size and
content location are printed, and the layer content can be exported: the ZIP
is downloaded into the export directory and unpacked into a 'layer-content'
subdirectory.

With several ARNs, a table with one row per layer is printed. If any ARN
cannot be resolved, no table is printed at all.

ARNs can be given as a comma-separated --layers value, as positional
arguments, or both.
"#
)]
pub struct AppArgs {
    /// Comma-separated list of layer version ARNs to inspect or export
    #[arg(short, long, value_name = "ARNS")]
    pub layers: Option<String>,

    /// Layer version ARNs to inspect or export
    #[arg(value_name = "ARN")]
    pub arns: Vec<String>,

    /// Directory to export the layer content to (single ARN only)
    ///
    /// When omitted the layer metadata is only printed to stdout
    #[arg(short, long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Configuration file, defaults to ./layer-inspect.yaml if present
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// AWS shared config profile, overrides the configuration file
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Lambda endpoint URL, overrides the configuration file
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl AppArgs {
    /// All ARNs passed on the command line: the `--layers` list first, then
    /// positional arguments. Entries are kept verbatim, including empty ones
    /// produced by stray commas, so that they fail resolution visibly.
    pub fn identifiers(&self) -> Vec<String> {
        let from_flag = self
            .layers
            .iter()
            .filter(|layers| !layers.is_empty())
            .flat_map(|layers| layers.split(','))
            .map(str::to_owned);

        from_flag.chain(self.arns.iter().cloned()).collect()
    }
}
