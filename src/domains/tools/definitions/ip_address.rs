//! Public IP namespace, backed by an ipinfo.io-compatible JSON endpoint.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::common::{fetch_text, structured};
use crate::core::config::Config;
use crate::domains::tools::{NamespaceDef, OpResult, OperationError};
use crate::operation;

pub const DESCRIPTION: &str = "Public IP address and geolocation utilities.";

pub fn namespace() -> NamespaceDef {
    NamespaceDef::from_module(module_path!(), DESCRIPTION)
        .operation(operation!(
            "public_ipv4",
            "Current public IP address with its approximate location and ISP name.",
            |_, config| public_ipv4(config)
        ))
        .operation(operation!(
            "approximate_physical_location",
            "Approximate physical location (country, state or province, city) of the public IP.",
            |_, config| approximate_physical_location(config)
        ))
}

/// Subset of the lookup service response we use.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IpInfo {
    ip: String,
    country: String,
    region: String,
    city: String,
    org: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalLocation {
    pub country: String,
    pub state_province: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicAddress {
    pub public_ip: String,
    pub physical_location: PhysicalLocation,
    pub isp_name: String,
}

/// `"AS7018 AT&T"` -> `"AT&T"`.
pub fn isp_from_org(org: &str) -> &str {
    org.split_once(' ').map_or(org, |(_, isp)| isp)
}

pub fn lookup(config: &Config) -> Result<PublicAddress, OperationError> {
    info!("Looking up public IP via {}", config.tools.ipinfo_url);
    let body = fetch_text(
        &config.tools.ipinfo_url,
        config.tools.ip_lookup_timeout(),
        "application/json",
    )
    .map_err(|e| OperationError::external(format!("Failed to look up public IP: {}", e)))?;

    let data: IpInfo = serde_json::from_str(&body).map_err(|e| {
        OperationError::external(format!("Unexpected response from IP lookup: {}", e))
    })?;

    Ok(PublicAddress {
        isp_name: isp_from_org(&data.org).to_string(),
        public_ip: data.ip,
        physical_location: PhysicalLocation {
            country: data.country,
            state_province: data.region,
            city: data.city,
        },
    })
}

pub fn public_ipv4(config: &Config) -> OpResult {
    structured(lookup(config)?)
}

pub fn approximate_physical_location(config: &Config) -> OpResult {
    structured(lookup(config)?.physical_location)
}
