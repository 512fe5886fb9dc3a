//! Wire-level data contracts shared with the finance API.
//!
//! Field names mirror the server payloads exactly; everything optional on the
//! wire decodes through `#[serde(default)]` so a missing key never fails a
//! whole response.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::format;
use crate::core::table::{CellValue, TableData};

/// A selectable dashboard identity, as returned by `/users/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Page of users. The endpoint is unpaged, the count is informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub items: Vec<UserProfile>,
    #[serde(default)]
    pub total_records: u64,
}

/// Counterparty account for peer transfers, with the owning user joined in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRef {
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Merchant for card/UPI payments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: String,
}

/// One transaction as rendered by the grid.
///
/// Exactly one of `to_account` / `merchant` is non-null; a null `to_account`
/// marks a merchant payment and is the sole branch condition for the expanded
/// detail section. Enum-like fields stay plain strings here so an unexpected
/// server value degrades to odd text instead of a failed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub transaction_mode: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub initiated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub to_account: Option<AccountRef>,
    #[serde(default)]
    pub merchant: Option<Merchant>,
}

impl TransactionRecord {
    /// Merchant payment vs peer transfer discriminator.
    pub fn is_merchant_payment(&self) -> bool {
        self.to_account.is_none()
    }

    /// Display name of the other side of the transaction.
    pub fn counterparty(&self) -> String {
        if let Some(account) = &self.to_account {
            if let Some(user) = &account.user
                && !user.name.is_empty()
            {
                return user.name.clone();
            }
            return account.account_number.clone();
        }
        match &self.merchant {
            Some(m) if !m.name.is_empty() => m.name.clone(),
            _ => format::DASH.to_string(),
        }
    }
}

/// One page slice of transactions plus the filtered total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub items: Vec<TransactionRecord>,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Analysis lists accompanying every insight result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub unnecessary_patterns: Vec<String>,
}

/// Full structured response to one natural-language query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(default)]
    pub visualization: Visualization,
}

/// Chart sub-kind discriminator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
}

/// One point of an already-aggregated chart series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: f64,
}

/// Uniform series consumed by all three chart strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub text_summary: String,
}

/// Decoded visualization payload.
///
/// Decoding is fail-open: an unknown `type`, an unknown `chartType`, or a
/// shape that does not fit any known variant lands in `Unsupported`, which
/// renders nothing while the analysis panel stays visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawVisualization")]
pub enum Visualization {
    Table(TableData),
    Chart(ChartKind, ChartSeries),
    #[default]
    Unsupported,
}

/// Loose superset of every visualization shape the server may send. Missing
/// keys default to empty so a sparse payload still decodes.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawVisualization {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default, rename = "chartType")]
    chart_type: String,
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
    #[serde(default)]
    data: Vec<ChartPoint>,
    #[serde(default)]
    text_summary: String,
}

impl From<RawVisualization> for Visualization {
    fn from(raw: RawVisualization) -> Self {
        match raw.kind.as_str() {
            "table" => {
                Visualization::Table(TableData::new(raw.headers, raw.rows, raw.text_summary))
            }
            "chart" => match raw.chart_type.parse::<ChartKind>() {
                Ok(kind) => Visualization::Chart(
                    kind,
                    ChartSeries {
                        points: raw.data,
                        text_summary: raw.text_summary,
                    },
                ),
                Err(_) => Visualization::Unsupported,
            },
            _ => Visualization::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::ColumnType;

    fn envelope(json: &str) -> ResultEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_table_envelope_decoding() {
        let env = envelope(
            r#"{
                "query": "List my top spends",
                "analysis": {
                    "recommendations": ["Consolidate transfers"],
                    "unnecessary_patterns": []
                },
                "visualization": {
                    "type": "table",
                    "headers": ["Description", "Amount"],
                    "rows": [["Transfer to Sarah Morgan", 7507.73], ["Other", 0]],
                    "text_summary": "Top spends this year."
                }
            }"#,
        );
        assert_eq!(env.query, "List my top spends");
        assert_eq!(env.analysis.recommendations.len(), 1);
        let Visualization::Table(table) = &env.visualization else {
            panic!("expected table visualization");
        };
        assert_eq!(table.headers, vec!["Description", "Amount"]);
        assert_eq!(table.column_types, vec![ColumnType::Text, ColumnType::Numeric]);
        assert_eq!(table.text_summary, "Top spends this year.");
    }

    #[test]
    fn test_chart_envelope_decoding() {
        let env = envelope(
            r#"{
                "query": "Categorize spending",
                "visualization": {
                    "type": "chart",
                    "chartType": "pie",
                    "data": [{"label": "Transfers", "value": 10791.17}],
                    "text_summary": "Mostly transfers."
                }
            }"#,
        );
        let Visualization::Chart(kind, series) = &env.visualization else {
            panic!("expected chart visualization");
        };
        assert_eq!(*kind, ChartKind::Pie);
        assert_eq!(series.points[0].label, "Transfers");
        assert!(env.analysis.recommendations.is_empty());
    }

    #[test]
    fn test_unknown_chart_kind_is_unsupported() {
        let env = envelope(
            r#"{
                "visualization": {
                    "type": "chart",
                    "chartType": "scatter",
                    "data": [{"label": "a", "value": 1}],
                    "text_summary": ""
                }
            }"#,
        );
        assert_eq!(env.visualization, Visualization::Unsupported);
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let env = envelope(r#"{"visualization": {"type": "gauge"}}"#);
        assert_eq!(env.visualization, Visualization::Unsupported);
    }

    #[test]
    fn test_missing_keys_decode_to_defaults() {
        // Absent data key on a chart: empty series, not an error.
        let env = envelope(r#"{"visualization": {"type": "chart", "chartType": "bar"}}"#);
        let Visualization::Chart(ChartKind::Bar, series) = &env.visualization else {
            panic!("expected bar chart");
        };
        assert!(series.points.is_empty());

        // Absent visualization entirely.
        let env = envelope(r#"{"query": "anything"}"#);
        assert_eq!(env.visualization, Visualization::Unsupported);
    }

    #[test]
    fn test_transaction_counterparty_branches() {
        let peer = TransactionRecord {
            to_account: Some(AccountRef {
                account_number: "ACC-1".into(),
                user: Some(UserSummary {
                    name: "Sarah Morgan".into(),
                    email: String::new(),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!peer.is_merchant_payment());
        assert_eq!(peer.counterparty(), "Sarah Morgan");

        let merchant = TransactionRecord {
            merchant: Some(Merchant {
                name: "Gates PLC Hotel".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(merchant.is_merchant_payment());
        assert_eq!(merchant.counterparty(), "Gates PLC Hotel");
    }

    #[test]
    fn test_transaction_record_decoding() {
        let record: TransactionRecord = serde_json::from_str(
            r#"{
                "_id": "66f1",
                "transaction_id": "TXN-0042",
                "amount": 4823.6,
                "currency": "INR",
                "transaction_type": "debit",
                "transaction_mode": "Card",
                "status": "success",
                "initiated_at": "2025-08-23T16:44:15.679000",
                "to_account": null,
                "merchant": {"_id": "m1", "name": "Gates PLC Hotel", "type": "Hotel", "category": "Travel"}
            }"#,
        )
        .unwrap();
        assert_eq!(record.transaction_id, "TXN-0042");
        assert!(record.initiated_at.is_some());
        assert!(record.is_merchant_payment());
        assert_eq!(record.merchant.as_ref().unwrap().kind, "Hotel");
    }

    #[test]
    fn test_user_profile_decoding() {
        let user: UserProfile = serde_json::from_str(
            r#"{"_id": "ba12171d-653b-4193-be99-ce8d8b1fc3c1", "name": "Douglas Kelly", "email": "kellypena@example.net"}"#,
        )
        .unwrap();
        assert_eq!(user.name, "Douglas Kelly");
        assert_eq!(
            user.id,
            "ba12171d-653b-4193-be99-ce8d8b1fc3c1".parse::<Uuid>().unwrap()
        );
    }
}
