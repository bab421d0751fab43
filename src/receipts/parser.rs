use axum::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParsedReceipt {
    pub merchant: Option<String>,
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// Turns an uploaded receipt into pantry-shaped line items. Real deployments
/// put an OCR service behind this; the app only depends on the trait.
#[async_trait]
pub trait ReceiptParser: Send + Sync {
    async fn parse(&self, body: Bytes, content_type: &str) -> anyhow::Result<ParsedReceipt>;
}

/// Plain-text fallback parser: one item per line, "<quantity> [unit] <name>".
/// A first line without digits is taken as the merchant.
#[derive(Debug, Clone, Default)]
pub struct LineReceiptParser;

fn parse_line(line: &str) -> Option<ReceiptItem> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;

    if let Ok(quantity) = first.parse::<f64>() {
        let rest: Vec<&str> = tokens.collect();
        let (unit, name_tokens) = match rest.split_first() {
            Some((head, tail)) if crate::pantry::units::unit_scale(head).is_some() => {
                (head.to_string(), tail.to_vec())
            }
            _ => (String::new(), rest),
        };
        let name = name_tokens.join(" ");
        if name.is_empty() {
            return None;
        }
        Some(ReceiptItem {
            name,
            quantity,
            unit,
        })
    } else {
        Some(ReceiptItem {
            name: line.trim().to_string(),
            quantity: 1.0,
            unit: String::new(),
        })
    }
}

#[async_trait]
impl ReceiptParser for LineReceiptParser {
    async fn parse(&self, body: Bytes, _content_type: &str) -> anyhow::Result<ParsedReceipt> {
        let text = String::from_utf8(body.to_vec())?;
        let mut merchant = None;
        let mut items = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if i == 0 && !line.chars().any(|c| c.is_ascii_digit()) {
                merchant = Some(line.to_string());
                continue;
            }
            if let Some(item) = parse_line(line) {
                items.push(item);
            }
        }

        Ok(ParsedReceipt { merchant, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_quantity_unit_name_lines() {
        let body = Bytes::from_static(b"Corner Grocer\n2 kg Chicken breast\n500 g Rice\n6 Eggs\n");
        let receipt = LineReceiptParser.parse(body, "text/plain").await.unwrap();

        assert_eq!(receipt.merchant.as_deref(), Some("Corner Grocer"));
        assert_eq!(receipt.items.len(), 3);
        assert_eq!(receipt.items[0].name, "Chicken breast");
        assert_eq!(receipt.items[0].quantity, 2.0);
        assert_eq!(receipt.items[0].unit, "kg");
        assert_eq!(receipt.items[2].name, "Eggs");
        assert_eq!(receipt.items[2].unit, "");
    }

    #[tokio::test]
    async fn lines_without_quantity_default_to_one() {
        let body = Bytes::from_static(b"1 jar of honey\nOlive oil\n");
        let receipt = LineReceiptParser.parse(body, "text/plain").await.unwrap();
        assert!(receipt.merchant.is_none());
        assert_eq!(receipt.items[1].name, "Olive oil");
        assert_eq!(receipt.items[1].quantity, 1.0);
    }

    #[tokio::test]
    async fn skips_blank_and_comment_lines() {
        let body = Bytes::from_static(b"\n# handwritten note\n2 kg Flour\n");
        let receipt = LineReceiptParser.parse(body, "text/plain").await.unwrap();
        assert_eq!(receipt.items.len(), 1);
    }

    #[tokio::test]
    async fn rejects_non_utf8_bodies() {
        let body = Bytes::from_static(&[0xff, 0xfe, 0x00]);
        assert!(LineReceiptParser.parse(body, "text/plain").await.is_err());
    }
}
