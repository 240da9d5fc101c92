//! Agent roster entries as reported by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A remote endpoint under management.
///
/// The `id` is the only identity: every other field is descriptive and may
/// change from one poll to the next. `is_active` and `last_seen` are
/// backend-authoritative; the console never writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Opaque unique identifier, stable across polls.
    pub id: String,
    /// Reported hostname of the endpoint.
    pub hostname: String,
    /// Last known IP address.
    pub ip: String,
    /// Operating system string.
    pub os: String,
    /// Liveness flag maintained by the backend.
    pub is_active: bool,
    /// Timestamp of last contact, non-decreasing while the agent is known.
    pub last_seen: DateTime<Utc>,
    /// Transport the agent registered over (e.g. "http"). Older backends
    /// omit it.
    #[serde(default)]
    pub protocol: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "3f6c2a1e",
            "hostname": "web-01",
            "ip": "10.0.4.17",
            "os": "linux",
            "isActive": true,
            "lastSeen": "2025-11-03T14:21:09Z",
            "protocol": "http"
        }"#
    }

    #[test]
    fn agent_deserializes_from_backend_json() {
        let agent: Agent = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(agent.id, "3f6c2a1e");
        assert_eq!(agent.hostname, "web-01");
        assert!(agent.is_active);
        assert_eq!(agent.protocol, "http");
    }

    #[test]
    fn agent_uses_camel_case_on_the_wire() {
        let agent: Agent = serde_json::from_str(sample_json()).unwrap();
        let json = serde_json::to_string(&agent).unwrap();
        assert!(json.contains("\"isActive\":true"));
        assert!(json.contains("\"lastSeen\""));
        assert!(!json.contains("is_active"));
    }

    #[test]
    fn missing_protocol_defaults_to_empty() {
        let json = r#"{
            "id": "a",
            "hostname": "h",
            "ip": "1.2.3.4",
            "os": "windows",
            "isActive": false,
            "lastSeen": "2025-11-03T14:21:09.120Z"
        }"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.protocol, "");
        assert!(!agent.is_active);
    }

    #[test]
    fn missing_id_is_rejected() {
        let json = r#"{
            "hostname": "h",
            "ip": "1.2.3.4",
            "os": "linux",
            "isActive": true,
            "lastSeen": "2025-11-03T14:21:09Z"
        }"#;
        assert!(serde_json::from_str::<Agent>(json).is_err());
    }

    #[test]
    fn malformed_last_seen_is_rejected() {
        let json = r#"{
            "id": "a",
            "hostname": "h",
            "ip": "1.2.3.4",
            "os": "linux",
            "isActive": true,
            "lastSeen": "yesterday"
        }"#;
        assert!(serde_json::from_str::<Agent>(json).is_err());
    }
}
