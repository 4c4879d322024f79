use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Snapshot of a stored link as handed out by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row layout shared by the SQL backends. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, FromRow)]
pub struct LinkRow {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub last_clicked_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TryFrom<LinkRow> for LinkRecord {
    type Error = anyhow::Error;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let last_clicked_at = row.last_clicked_at.map(from_millis).transpose()?;

        Ok(LinkRecord {
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            clicks: row.clicks,
            last_clicked_at,
            created_at: from_millis(row.created_at)?,
            updated_at: from_millis(row.updated_at)?,
        })
    }
}

fn from_millis(millis: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow::anyhow!("timestamp out of range: {millis}"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub url: String,
    #[serde(default)]
    pub short_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_keeps_millisecond_precision() {
        let row = LinkRow {
            id: 7,
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            clicks: 3,
            last_clicked_at: Some(1_700_000_000_123),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_123,
        };

        let record = LinkRecord::try_from(row).unwrap();
        assert_eq!(record.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(
            record.last_clicked_at.map(|t| t.timestamp_millis()),
            Some(1_700_000_000_123)
        );
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let now = Utc::now();
        let record = LinkRecord {
            id: 1,
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            clicks: 0,
            last_clicked_at: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["shortCode"], "abc123");
        assert_eq!(json["originalUrl"], "https://example.com");
        assert!(json["lastClickedAt"].is_null());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_create_request_short_code_is_optional() {
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert!(req.short_code.is_none());

        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "shortCode": "abc123"}"#)
                .unwrap();
        assert_eq!(req.short_code.as_deref(), Some("abc123"));
    }
}
