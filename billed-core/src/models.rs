use serde::{Deserialize, Serialize};

/// Categories offered by the expense-type selector.
pub const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

pub const DEFAULT_PCT: i64 = 20;

/// Lifecycle status of a bill. Only `Pending` is ever assigned locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refused",
        }
    }
}

/// Expense bill as exchanged with the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub expense_type: String,
    #[serde(default)]
    pub name: String,
    /// `None` when the amount input did not start with an integer.
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub vat: String,
    #[serde(default = "default_pct")]
    pub pct: i64,
    #[serde(default)]
    pub commentary: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

fn default_pct() -> i64 {
    DEFAULT_PCT
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_uses_backend_field_names() {
        let record = BillRecord {
            email: "a@a".to_string(),
            expense_type: "Transports".to_string(),
            amount: None,
            pct: 20,
            file_url: Some("https://files/receipt.png".to_string()),
            file_name: Some("receipt.png".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "Transports");
        assert_eq!(value["fileUrl"], "https://files/receipt.png");
        assert_eq!(value["fileName"], "receipt.png");
        assert_eq!(value["amount"], serde_json::Value::Null);
        assert_eq!(value["status"], "pending");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn backend_record_with_missing_fields_deserializes() {
        let record: BillRecord = serde_json::from_value(json!({
            "id": "47qAXb6fIm2zOKkLzMro",
            "type": "Hôtel et logement",
            "date": "2004-04-04",
            "status": "accepted"
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("47qAXb6fIm2zOKkLzMro"));
        assert_eq!(record.status, BillStatus::Accepted);
        assert_eq!(record.pct, DEFAULT_PCT);
        assert!(record.file_url.is_none());
    }
}
