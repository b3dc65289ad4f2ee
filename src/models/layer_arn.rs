use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::errors::ParseError;

lazy_static! {
    static ref LAYER_NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,140}$").unwrap();
}

const SERVICE: &str = "lambda";
const RESOURCE_TYPE: &str = "layer";

/// A fully qualified Lambda layer version ARN, e.g.
/// `arn:aws:lambda:eu-west-1:123456789012:layer:my-layer:3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerArn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource_type: String,
    pub name: String,
    pub version: u64,
}

impl FromStr for LayerArn {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = input.split(':').collect();
        let [prefix, partition, service, region, account_id, resource_type, name, version] =
            segments[..]
        else {
            return Err(ParseError::SegmentCount {
                found: segments.len(),
            });
        };

        if prefix != "arn" {
            return Err(ParseError::MissingPrefix {
                found: prefix.to_owned(),
            });
        }
        if partition != "aws" && !partition.strip_prefix("aws-").is_some_and(|s| !s.is_empty()) {
            return Err(ParseError::Partition {
                found: partition.to_owned(),
            });
        }
        if service != SERVICE {
            return Err(ParseError::Service {
                found: service.to_owned(),
            });
        }
        if region.is_empty() {
            return Err(ParseError::EmptyRegion);
        }
        if region.chars().any(char::is_whitespace) {
            return Err(ParseError::Region {
                found: region.to_owned(),
            });
        }
        if account_id.len() != 12 || !account_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::Account {
                found: account_id.to_owned(),
            });
        }
        if resource_type != RESOURCE_TYPE {
            return Err(ParseError::ResourceType {
                found: resource_type.to_owned(),
            });
        }
        if !LAYER_NAME_RE.is_match(name) {
            return Err(ParseError::Name {
                found: name.to_owned(),
            });
        }

        // u64::from_str accepts a leading '+', which would not round-trip
        let version = version
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| version.parse::<u64>().ok())
            .flatten()
            .filter(|v| *v >= 1)
            .ok_or_else(|| ParseError::Version {
                found: version.to_owned(),
            })?;

        Ok(LayerArn {
            partition: partition.to_owned(),
            service: service.to_owned(),
            region: region.to_owned(),
            account_id: account_id.to_owned(),
            resource_type: resource_type.to_owned(),
            name: name.to_owned(),
            version,
        })
    }
}

impl fmt::Display for LayerArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}:{}:{}",
            self.partition,
            self.service,
            self.region,
            self.account_id,
            self.resource_type,
            self.name,
            self.version
        )
    }
}
