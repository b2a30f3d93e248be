//! Field mapping for network-exchange telemetry.
//!
//! Projects the source of an exchange onto a flat string-keyed map that
//! contains only the fields that are actually set. The mapping is one-way
//! and independent of insertion order.

use std::net::IpAddr;

use serde_json::{Map, Value};

/// String-keyed field map emitted for event enrichment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(Map<String, Value>);

impl FieldMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Sets `key` only when `value` is non-empty.
    pub fn maybe_set_str(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.set(key, value);
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the map and returns the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// The source of a network exchange.
///
/// # Examples
///
/// ```
/// use std::net::{IpAddr, Ipv4Addr};
/// use typed_ops::telemetry::Source;
///
/// let source = Source {
///     domain: "h".to_string(),
///     ip: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
///     port: 443,
/// };
///
/// let fields = source.fields();
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields.get("ip").unwrap(), "127.0.0.1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    /// The client's domain (FQDN)
    pub domain: String,
    /// The client's IP address
    pub ip: Option<IpAddr>,
    /// The client's port
    pub port: i64,
}

impl Source {
    /// Returns the fields that are set: `domain` when non-empty, `ip` in
    /// canonical text form when present, `port` when positive.
    ///
    /// IPv4-mapped IPv6 addresses are rendered as plain IPv4.
    pub fn fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.maybe_set_str("domain", &self.domain);
        if let Some(ip) = self.ip {
            fields.set("ip", ip.to_canonical().to_string());
        }
        if self.port > 0 {
            fields.set("port", self.port);
        }
        fields
    }
}
