//! Google Sheets mirror: one row per order.
//!
//! Created orders are appended; transitions update the existing row in
//! place (found by order id in column A), appending instead when the row
//! has gone missing.

use async_trait::async_trait;
use intake_models::Order;
use serde_json::json;
use tracing::debug;

use crate::render::{format_datetime, items_summary};
use crate::{Notifier, NotifyError, Result};

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Column layout of the mirror sheet.
const HEADER: [&str; 10] = [
    "Order ID",
    "Created At",
    "Status",
    "Items",
    "Total Amount",
    "Delivery Address",
    "Email",
    "Phone",
    "Expected Delivery",
    "Actual Delivery",
];

/// Notifier that mirrors orders into one worksheet.
pub struct SheetsNotifier {
    client: reqwest::Client,
    spreadsheet_id: String,
    api_token: String,
    sheet_name: String,
}

impl SheetsNotifier {
    /// Creates a mirror for the first worksheet (`Sheet1`) of a spreadsheet.
    pub fn new(spreadsheet_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            api_token: api_token.into(),
            sheet_name: "Sheet1".to_string(),
        }
    }

    /// Uses a different worksheet name.
    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    fn values_url(&self, range: &str) -> String {
        format!("{SHEETS_API_URL}/{}/values/{range}", self.spreadsheet_id)
    }

    fn order_row(order: &Order) -> Vec<String> {
        vec![
            order.id.to_string(),
            format_datetime(Some(order.created_at)),
            order.status.to_string(),
            items_summary(order),
            order.total_amount.to_string(),
            order.delivery_address.clone().unwrap_or_default(),
            order.contact_email.clone().unwrap_or_default(),
            order.contact_phone.clone().unwrap_or_default(),
            format_datetime(order.expected_delivery_date),
            format_datetime(order.actual_delivery_date),
        ]
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let json: serde_json::Value =
            response.json().await.map_err(|e| NotifyError::Http(e.to_string()))?;

        let values = json["values"]
            .as_array()
            .map(|rows| {
                rows.iter()
                    .map(|row| {
                        row.as_array()
                            .map(|cells| {
                                cells
                                    .iter()
                                    .map(|c| c.as_str().unwrap_or_default().to_string())
                                    .collect()
                            })
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(values)
    }

    async fn put_values(&self, range: &str, rows: Vec<Vec<String>>) -> Result<()> {
        self.client
            .put(format!("{}?valueInputOption=RAW", self.values_url(range)))
            .bearer_auth(&self.api_token)
            .json(&json!({ "values": rows }))
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        Ok(())
    }

    async fn append_row(&self, row: Vec<String>) -> Result<()> {
        self.client
            .post(format!(
                "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
                self.values_url(&self.sheet_name)
            ))
            .bearer_auth(&self.api_token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        Ok(())
    }

    /// Writes the header row when it is missing or stale.
    async fn ensure_header(&self) -> Result<()> {
        let range = format!("{}!1:1", self.sheet_name);
        let existing = self.get_values(&range).await?;
        let current: Vec<String> = existing.into_iter().next().unwrap_or_default();
        if current != HEADER {
            self.put_values(&range, vec![HEADER.iter().map(|s| s.to_string()).collect()])
                .await?;
        }
        Ok(())
    }

    /// 1-based sheet row holding the given order id, if any.
    async fn find_order_row(&self, order_id: i64) -> Result<Option<usize>> {
        let id_column = self.get_values(&format!("{}!A:A", self.sheet_name)).await?;
        let wanted = order_id.to_string();
        // Row 1 is the header.
        Ok(id_column
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.first().map(|cell| cell == &wanted).unwrap_or(false))
            .map(|(index, _)| index + 1))
    }
}

#[async_trait]
impl Notifier for SheetsNotifier {
    fn name(&self) -> &str {
        "sheets"
    }

    async fn order_created(&self, order: &Order) -> Result<()> {
        self.ensure_header().await?;
        self.append_row(Self::order_row(order)).await?;
        debug!(order_id = order.id, "Order appended to sheet");
        Ok(())
    }

    async fn order_updated(&self, order: &Order) -> Result<()> {
        self.ensure_header().await?;
        match self.find_order_row(order.id).await? {
            Some(row_index) => {
                let range = format!("{0}!A{1}:J{1}", self.sheet_name, row_index);
                self.put_values(&range, vec![Self::order_row(order)]).await?;
                debug!(order_id = order.id, row = row_index, "Order row updated in sheet");
            }
            None => {
                // Row went missing; fall back to appending a fresh one.
                self.append_row(Self::order_row(order)).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use intake_models::OrderStatus;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_order_row_layout_matches_header() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
        let order = Order {
            id: 12,
            created_at: now,
            updated_at: now,
            status: OrderStatus::Confirmed,
            delivery_address: Some("Lenina 15".to_string()),
            contact_email: Some("a@b.co".to_string()),
            contact_phone: None,
            total_amount: dec!(175.50),
            expected_delivery_date: None,
            actual_delivery_date: None,
            source_message: String::new(),
            items: Vec::new(),
            history: Vec::new(),
        };

        let row = SheetsNotifier::order_row(&order);
        assert_eq!(row.len(), HEADER.len());
        assert_eq!(row[0], "12");
        assert_eq!(row[2], "confirmed");
        assert_eq!(row[4], "175.50");
        assert_eq!(row[7], "");
    }
}
