//! Sale receipts
//!
//! A receipt is the immutable text record of a completed sale. Its id is
//! also its file name: `<UTC timestamp>_<client id>_<random suffix>`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::basket::{PlannedLine, SalePlan};

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%6f";
const RULE_WIDTH: usize = 44;

/// Store name printed at the top of every receipt
pub const STORE_NAME: &str = "CREACIONES MECHAS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub client_id: i32,
    pub client_name: String,
    pub lines: Vec<PlannedLine>,
    pub total: Decimal,
}

/// What the history view knows about a receipt from its id alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub client_id: i32,
}

/// Build a receipt id. The random suffix keeps two sales for the same
/// client within the same microsecond apart.
pub fn receipt_id(issued_at: DateTime<Utc>, client_id: i32, nonce: Uuid) -> String {
    let suffix = nonce.simple().to_string();
    format!(
        "{}_{}_{}",
        issued_at.format(TIMESTAMP_FORMAT),
        client_id,
        &suffix[..8]
    )
}

/// Recover the timestamp and client from a receipt id
pub fn parse_receipt_id(id: &str) -> Option<ReceiptSummary> {
    let mut parts = id.splitn(3, '_');
    let timestamp = parts.next()?;
    let client = parts.next()?;
    let suffix = parts.next()?;
    if suffix.is_empty() {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    Some(ReceiptSummary {
        id: id.to_string(),
        issued_at: Utc.from_utc_datetime(&naive),
        client_id: client.parse().ok()?,
    })
}

impl Receipt {
    pub fn new(
        client_id: i32,
        client_name: &str,
        plan: &SalePlan,
        issued_at: DateTime<Utc>,
        nonce: Uuid,
    ) -> Self {
        Self {
            id: receipt_id(issued_at, client_id, nonce),
            issued_at,
            client_id,
            client_name: client_name.to_string(),
            lines: plan.lines.clone(),
            total: plan.total,
        }
    }

    /// Plain-text rendering written to the receipt file
    pub fn render(&self) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);
        let mut out = String::new();

        out.push_str(&heavy);
        out.push('\n');
        out.push_str(&format!("{:^width$}\n", STORE_NAME, width = RULE_WIDTH));
        out.push_str(&format!("{:^width$}\n", "SALE RECEIPT", width = RULE_WIDTH));
        out.push_str(&heavy);
        out.push('\n');
        out.push_str(&format!("Receipt: {}\n", self.id));
        out.push_str(&format!(
            "Date:    {}\n",
            self.issued_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("Client:  {} (#{})\n", self.client_name, self.client_id));
        out.push_str(&light);
        out.push('\n');

        for line in &self.lines {
            out.push_str(&format!("{} {}\n", line.product_id, line.product_name));
            out.push_str(&format!(
                "    {} x {} = {}\n",
                line.quantity, line.unit_price, line.subtotal
            ));
        }

        out.push_str(&light);
        out.push('\n');
        out.push_str(&format!("TOTAL: {}\n", self.total));
        out.push_str(&heavy);
        out.push('\n');
        out
    }
}
