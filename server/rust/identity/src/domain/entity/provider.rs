use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::changes_log::EntityId;
use super::tracked_entity::TrackedEntity;

/// Provider は講座を提供する事業者を表す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub id: Uuid,
    pub full_title: String,
    pub edrpou_ipn: String,
    pub director: Option<String>,
    pub legal_address: Option<String>,
    pub email: String,
}

impl TrackedEntity for Provider {
    fn entity_type(&self) -> &str {
        "Provider"
    }

    fn entity_id(&self) -> EntityId {
        EntityId::Guid(self.id)
    }

    fn project(&self) -> HashMap<String, String> {
        let mut values = HashMap::from([
            ("FullTitle".to_string(), self.full_title.clone()),
            ("EdrpouIpn".to_string(), self.edrpou_ipn.clone()),
            ("Email".to_string(), self.email.clone()),
        ]);
        if let Some(ref director) = self.director {
            values.insert("Director".to_string(), director.clone());
        }
        if let Some(ref address) = self.legal_address {
            values.insert("LegalAddress".to_string(), address.clone());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_projection_skips_absent_values() {
        let provider = Provider {
            id: Uuid::new_v4(),
            full_title: "Sunny Kids".to_string(),
            edrpou_ipn: "12345678".to_string(),
            director: None,
            legal_address: Some("Kyiv, Main st. 1".to_string()),
            email: "info@sunny.example.com".to_string(),
        };
        let values = provider.project();
        assert_eq!(values.get("FullTitle").map(String::as_str), Some("Sunny Kids"));
        assert!(!values.contains_key("Director"));
        assert!(values.contains_key("LegalAddress"));
        assert_eq!(provider.entity_id(), EntityId::Guid(provider.id));
    }
}
