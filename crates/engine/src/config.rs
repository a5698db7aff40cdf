use serde::{Deserialize, Serialize};

use stockbook_locations::ProvisioningPolicy;

/// Engine-level knobs. Deserializable so hosts can load it from their own
/// config files; every field has a working default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// What to do when goods arrive for a product with no stock location.
    #[serde(default)]
    pub provisioning: ProvisioningPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_auto_provisions() {
        assert_eq!(
            EngineConfig::default().provisioning,
            ProvisioningPolicy::AutoProvision
        );
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig =
            serde_json::from_str(r#"{"provisioning":"reject"}"#).unwrap();
        assert_eq!(config.provisioning, ProvisioningPolicy::Reject);
    }
}
