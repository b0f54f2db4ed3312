use serde::{Deserialize, Serialize};

/// The kind of a workflow document.
///
/// Used as part of the state-store key and to select the number range a
/// document is issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A purchase requisition.
    Requisition,

    /// A purchase order.
    Order,
}

impl DocumentKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Requisition => "requisition",
            DocumentKind::Order => "order",
        }
    }

    /// Returns the document-number prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Requisition => "PR",
            DocumentKind::Order => "PO",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique, immutable document number assigned at creation.
///
/// Formatted as `PR-000001` / `PO-000001`. Wraps a string to prevent mixing
/// document numbers up with other string-valued fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentNumber(String);

impl DocumentNumber {
    /// Formats a document number from a kind and a sequence value.
    pub fn from_sequence(kind: DocumentKind, sequence: u64) -> Self {
        Self(format!("{}-{:06}", kind.prefix(), sequence))
    }

    /// Returns the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocumentNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DocumentNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// State-store key for a document: kind plus number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    /// The document kind.
    pub kind: DocumentKind,

    /// The document number within that kind.
    pub number: DocumentNumber,
}

impl DocumentKey {
    /// Creates a new key.
    pub fn new(kind: DocumentKind, number: DocumentNumber) -> Self {
        Self { kind, number }
    }

    /// Creates a requisition key.
    pub fn requisition(number: DocumentNumber) -> Self {
        Self::new(DocumentKind::Requisition, number)
    }

    /// Creates an order key.
    pub fn order(number: DocumentNumber) -> Self {
        Self::new(DocumentKind::Order, number)
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.number)
    }
}

/// Typed reference to a single item line of another document.
///
/// Replaces loosely formatted back-reference strings: both sides of a
/// cross-document link carry the document number and the 1-based item number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    /// Number of the referenced document.
    pub document: DocumentNumber,

    /// 1-based item number within that document.
    pub item_number: u32,
}

impl ItemRef {
    /// Creates a new item reference.
    pub fn new(document: DocumentNumber, item_number: u32) -> Self {
        Self {
            document,
            item_number,
        }
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.document, self.item_number)
    }
}

/// Material master identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(String);

impl MaterialId {
    /// Creates a new material ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the material ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MaterialId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MaterialId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for MaterialId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_number_formatting() {
        let number = DocumentNumber::from_sequence(DocumentKind::Requisition, 1);
        assert_eq!(number.as_str(), "PR-000001");

        let number = DocumentNumber::from_sequence(DocumentKind::Order, 42);
        assert_eq!(number.as_str(), "PO-000042");
    }

    #[test]
    fn document_number_serialization_roundtrip() {
        let number = DocumentNumber::from_sequence(DocumentKind::Order, 7);
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"PO-000007\"");

        let deserialized: DocumentNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(number, deserialized);
    }

    #[test]
    fn document_key_display() {
        let key = DocumentKey::requisition("PR-000003".into());
        assert_eq!(key.to_string(), "requisition/PR-000003");

        let key = DocumentKey::order("PO-000001".into());
        assert_eq!(key.to_string(), "order/PO-000001");
    }

    #[test]
    fn document_kind_serialization() {
        let json = serde_json::to_string(&DocumentKind::Requisition).unwrap();
        assert_eq!(json, "\"requisition\"");

        let kind: DocumentKind = serde_json::from_str("\"order\"").unwrap();
        assert_eq!(kind, DocumentKind::Order);
    }

    #[test]
    fn item_ref_display() {
        let item_ref = ItemRef::new("PR-000001".into(), 2);
        assert_eq!(item_ref.to_string(), "PR-000001#2");
    }

    #[test]
    fn material_id_string_conversion() {
        let id = MaterialId::new("MAT-001");
        assert_eq!(id.as_str(), "MAT-001");

        let id2: MaterialId = "MAT-002".into();
        assert_eq!(id2.as_str(), "MAT-002");
    }
}
