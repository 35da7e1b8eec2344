use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

// ============ DNS Record Types ============

/// DNS record type identifier.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Sender Policy Framework record.
    Spf,
    /// Delegation signer record.
    Ds,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
    /// Reverse pointer record.
    Ptr,
}

impl DnsRecordType {
    /// Uppercase wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Spf => "SPF",
            Self::Ds => "DS",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Ptr => "PTR",
        }
    }

    /// Whether records of this type carry a priority.
    pub fn uses_priority(self) -> bool {
        matches!(self, Self::Mx | Self::Srv)
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsRecordType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "SPF" => Ok(Self::Spf),
            "DS" => Ok(Self::Ds),
            "NS" => Ok(Self::Ns),
            "SRV" => Ok(Self::Srv),
            "CAA" => Ok(Self::Caa),
            "PTR" => Ok(Self::Ptr),
            _ => Err(format!("Unsupported record type: {s}")),
        }
    }
}

// ============ Provider Policy Types ============

/// How a provider expects MX priority to be transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MxEncoding {
    /// Priority travels in [`RecordSpec::priority`], the value stays bare.
    #[default]
    SeparateField,
    /// Priority is folded into the value as `"<priority> <value>"`.
    PrefixedValue,
}

impl MxEncoding {
    /// Apply this encoding to an MX value. Returns the wire values and the wire priority.
    pub fn encode(self, priority: u16, value: &str) -> (String, Option<u16>) {
        match self {
            Self::SeparateField => (value.to_string(), Some(priority)),
            Self::PrefixedValue => (format!("{priority} {value}"), None),
        }
    }
}

/// How a provider addresses existing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordAddressing {
    /// The provider issues record identifiers which callers may cache and reuse.
    Identifier,
    /// Records are addressed by host, type and value; no identifiers exist.
    #[default]
    Content,
}

/// Per-provider policy flags consulted by the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFeatures {
    /// MX priority encoding.
    pub mx_encoding: MxEncoding,
    /// Record addressing mode.
    pub addressing: RecordAddressing,
}

// ============ Zone / Record Exchange Types ============

/// Provider-agnostic description of a record mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSpec {
    /// Record type.
    pub record_type: DnsRecordType,
    /// Subname relative to the zone; `"@"` or empty denotes the apex.
    pub host: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Ordered record values, at least one.
    pub values: Vec<String>,
    /// Priority for MX/SRV-like types, when transmitted separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl RecordSpec {
    /// Build a single-value spec.
    pub fn new(
        record_type: DnsRecordType,
        host: impl Into<String>,
        ttl: u32,
        value: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            host: host.into(),
            ttl,
            values: vec![value.into()],
            priority: None,
        }
    }

    /// Set the separately transmitted priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Option<u16>) -> Self {
        self.priority = priority;
        self
    }

    /// Check the fields every provider requires.
    pub fn validate(&self, provider: &str) -> Result<()> {
        if self.ttl == 0 {
            return Err(invalid(provider, "ttl", "must be a positive number of seconds"));
        }
        if self.values.is_empty() {
            return Err(invalid(provider, "values", "at least one value is required"));
        }
        if self.values.iter().any(|v| v.trim().is_empty()) {
            return Err(invalid(provider, "values", "values must not be empty"));
        }
        Ok(())
    }
}

fn invalid(provider: &str, param: &str, detail: &str) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: provider.to_string(),
        param: param.to_string(),
        detail: detail.to_string(),
    }
}

/// Identifies an existing record for update or delete.
///
/// `host` and `record_type` are always present. `remote_id` is supplied when the local
/// store tracks a provider identifier; `current_value` narrows content-addressed lookups
/// when several records share host and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    /// Subname relative to the zone.
    pub host: String,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Provider-issued record identifier, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    /// Current value of the record, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
}

impl RecordKey {
    pub fn new(host: impl Into<String>, record_type: DnsRecordType) -> Self {
        Self {
            host: host.into(),
            record_type,
            remote_id: None,
            current_value: None,
        }
    }

    #[must_use]
    pub fn with_remote_id(mut self, remote_id: Option<String>) -> Self {
        self.remote_id = remote_id;
        self
    }

    #[must_use]
    pub fn with_current_value(mut self, value: Option<String>) -> Self {
        self.current_value = value;
        self
    }

    /// Short description used in errors and logs, e.g. `www A`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.host, self.record_type)
    }
}

/// Result of a remote zone creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteZoneRef {
    /// Zone name as confirmed by the provider.
    pub name: String,
    /// Provider-issued zone identifier; `None` for name-keyed providers.
    pub remote_id: Option<String>,
}

/// Result of a remote record creation or update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecordRef {
    /// Provider-issued record identifier; `None` for content-addressed providers.
    pub remote_id: Option<String>,
}

/// One record in a provider's authoritative zone state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub host: String,
    pub record_type: DnsRecordType,
    pub ttl: u32,
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

/// Authoritative state of a zone as reported by its provider.
///
/// Compared structurally by the reconciler, so providers must return records in a
/// deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSnapshot {
    /// Zone name.
    pub name: String,
    /// Provider-issued zone identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    /// Records in the zone.
    pub records: Vec<SnapshotRecord>,
}

// ============ Configuration ============

/// Typed provider configuration.
///
/// `provider` selects the implementation; the named fields cover the credential shapes
/// shared by provider families and `options` carries everything provider-specific.
/// Serialized flat:
///
/// ```json
/// { "provider": "Bind", "apikey": "user:pass", "bindip": "192.168.1.100" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider selector, matched against the registry.
    pub provider: String,
    /// API key or token. Some providers expect a colon-joined `id:secret` pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    /// API host or address for self-hosted providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
    /// Separate auth identifier for providers using id/password authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    /// Separate auth password for providers using id/password authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<String>,
    /// Provider-specific options.
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

const PROVIDER_KEY: &str = "provider";
const APIKEY_KEY: &str = "apikey";
const API_HOST_KEY: &str = "api_host";
const AUTH_ID_KEY: &str = "auth_id";
const AUTH_PASSWORD_KEY: &str = "auth_password";

impl ProviderConfig {
    /// Create a configuration with only the provider selector set.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_apikey(mut self, apikey: impl Into<String>) -> Self {
        self.apikey = Some(apikey.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up a provider-specific option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Return the API key or an `InvalidParameter` error if it is missing or blank.
    pub fn require_apikey(&self) -> Result<&str> {
        match self.apikey.as_deref() {
            Some(k) if !k.trim().is_empty() => Ok(k),
            _ => Err(invalid(&self.provider, APIKEY_KEY, "API key cannot be empty")),
        }
    }

    /// Split a colon-joined `id:secret` API key.
    pub fn credential_pair(&self) -> Result<(&str, &str)> {
        let key = self.require_apikey()?;
        match key.split_once(':') {
            Some((id, secret)) if !id.is_empty() && !secret.is_empty() => Ok((id, secret)),
            _ => Err(invalid(
                &self.provider,
                APIKEY_KEY,
                "API key must be in the format 'id:secret'",
            )),
        }
    }

    /// Construct a configuration from a flat key-value map.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the `provider` key is missing or blank.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let provider = match map.get(PROVIDER_KEY) {
            Some(p) if !p.trim().is_empty() => p.clone(),
            _ => return Err(invalid("config", PROVIDER_KEY, "provider name is required")),
        };

        let mut config = Self::new(provider);
        for (key, value) in map {
            match key.as_str() {
                PROVIDER_KEY => {}
                APIKEY_KEY => config.apikey = Some(value.clone()),
                API_HOST_KEY => config.api_host = Some(value.clone()),
                AUTH_ID_KEY => config.auth_id = Some(value.clone()),
                AUTH_PASSWORD_KEY => config.auth_password = Some(value.clone()),
                _ => {
                    config.options.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(config)
    }

    /// Convert to a flat key-value map.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = self
            .options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        map.insert(PROVIDER_KEY.to_string(), self.provider.clone());
        let named = [
            (APIKEY_KEY, &self.apikey),
            (API_HOST_KEY, &self.api_host),
            (AUTH_ID_KEY, &self.auth_id),
            (AUTH_PASSWORD_KEY, &self.auth_password),
        ];
        for (key, value) in named {
            if let Some(v) = value {
                map.insert(key.to_string(), v.clone());
            }
        }
        map
    }
}
