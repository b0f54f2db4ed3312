//! Document-level vocabulary shared by requisitions and orders.

use serde::{Deserialize, Serialize};

/// How the requested goods or services are procured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementType {
    /// Regular stock procurement.
    #[default]
    Standard,

    /// External services.
    Service,

    /// Vendor-owned stock consumed on site.
    Consignment,

    /// Components provided to a subcontractor.
    Subcontracting,
}

impl ProcurementType {
    /// Returns the procurement type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcurementType::Standard => "standard",
            ProcurementType::Service => "service",
            ProcurementType::Consignment => "consignment",
            ProcurementType::Subcontracting => "subcontracting",
        }
    }
}

impl std::fmt::Display for ProcurementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_standard() {
        assert_eq!(ProcurementType::default(), ProcurementType::Standard);
    }

    #[test]
    fn serialization_roundtrip() {
        let json = serde_json::to_string(&ProcurementType::Subcontracting).unwrap();
        assert_eq!(json, "\"subcontracting\"");

        let parsed: ProcurementType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ProcurementType::Subcontracting);
    }

    #[test]
    fn display() {
        assert_eq!(ProcurementType::Service.to_string(), "service");
    }
}
