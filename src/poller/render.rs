//! Turns feed states into dashboard cards with placeholder text.

use serde_json::Value;

use super::{DashboardState, Feed, FeedState};

pub const LOADING: &str = "Loading...";
pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub value: String,
}

impl Card {
    fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// Cards for every feed, in feed order. Warehouse details expand to one card per warehouse.
pub fn cards(state: &DashboardState) -> Vec<Card> {
    let mut out = Vec::new();
    for (feed, feed_state) in state.feeds() {
        match feed_state {
            FeedState::Loading => out.push(Card::new(feed.title(), LOADING)),
            FeedState::Unavailable => out.push(Card::new(feed.title(), placeholder(*feed))),
            FeedState::Ready(body) => out.extend(ready_cards(*feed, body)),
        }
    }
    out
}

/// Plain-text rendering with aligned titles.
pub fn render_text(cards: &[Card]) -> String {
    let width = cards.iter().map(|c| c.title.chars().count()).max().unwrap_or(0);
    cards
        .iter()
        .map(|c| format!("{:<width$}  {}\n", c.title, c.value))
        .collect()
}

fn placeholder(feed: Feed) -> String {
    match feed {
        Feed::TotalInventory => format!("{PLACEHOLDER} units"),
        Feed::AvailableStorage => format!("{PLACEHOLDER} slots"),
        _ => PLACEHOLDER.to_string(),
    }
}

fn ready_cards(feed: Feed, body: &Value) -> Vec<Card> {
    let value = match feed {
        Feed::TotalInventory => body["total_inventory"]
            .as_i64()
            .map(|n| format!("{} units", group_thousands(n))),
        Feed::OverallUtilization => body["overall_utilization_percentage"]
            .as_str()
            .map(str::to_string),
        Feed::AvailableStorage => body["overall_available_storage"]
            .as_i64()
            .map(|n| format!("{} slots", group_thousands(n))),
        Feed::WarehouseUtilization => utilization_line(body),
        Feed::WarehouseDetails => return warehouse_cards(body),
        Feed::Forecast => opaque_count(body).map(|n| format!("{n} forecasts")),
        Feed::Optimization => opaque_count(body).map(|n| format!("{n} recommendations")),
    };
    vec![Card::new(
        feed.title(),
        value.unwrap_or_else(|| placeholder(feed)),
    )]
}

/// `"A 50.00%, B 20.00%"`, one entry per warehouse in response order.
fn utilization_line(body: &Value) -> Option<String> {
    let entries = body["warehouse_utilization"].as_array()?;
    if entries.is_empty() {
        return Some("No warehouses".to_string());
    }
    let parts: Vec<String> = entries
        .iter()
        .map(|u| {
            format!(
                "{} {}",
                u["warehouse_id"].as_str().unwrap_or(PLACEHOLDER),
                u["utilization_percentage"].as_str().unwrap_or(PLACEHOLDER)
            )
        })
        .collect();
    Some(parts.join(", "))
}

fn warehouse_cards(body: &Value) -> Vec<Card> {
    let Some(warehouses) = body["warehouses"].as_array() else {
        return vec![Card::new(Feed::WarehouseDetails.title(), PLACEHOLDER)];
    };
    if warehouses.is_empty() {
        return vec![Card::new(Feed::WarehouseDetails.title(), "No warehouses")];
    }

    warehouses
        .iter()
        .map(|w| {
            let title = w["name"]
                .as_str()
                .filter(|s| !s.is_empty())
                .or_else(|| w["warehouse_id"].as_str())
                .unwrap_or(PLACEHOLDER);
            let stock = w["total_stock"]
                .as_i64()
                .map(group_thousands)
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            let utilization = w["utilization_percentage"].as_str().unwrap_or(PLACEHOLDER);
            Card::new(title, format!("{stock} units, {utilization} used"))
        })
        .collect()
}

/// External services have their own schemas; only the number of entries is shown.
fn opaque_count(body: &Value) -> Option<usize> {
    match body {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_with(entries: Vec<(Feed, FeedState)>) -> DashboardState {
        let mut state = DashboardState::default();
        for (feed, feed_state) in entries {
            state.set(feed, feed_state);
        }
        state
    }

    #[test]
    fn loading_feeds_show_loading_text() {
        let state = DashboardState::loading(&[Feed::TotalInventory, Feed::AvailableStorage]);
        let cards = cards(&state);
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.value == LOADING));
    }

    #[test]
    fn ready_feeds_render_values() {
        let state = state_with(vec![
            (Feed::TotalInventory, FeedState::Ready(json!({ "total_inventory": 1234567 }))),
            (
                Feed::OverallUtilization,
                FeedState::Ready(json!({ "overall_utilization_percentage": "40.00%" })),
            ),
            (
                Feed::AvailableStorage,
                FeedState::Ready(json!({ "overall_available_storage": 90, "warehouses": [] })),
            ),
        ]);
        let values: Vec<String> = cards(&state).into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["1,234,567 units", "40.00%", "90 slots"]);
    }

    #[test]
    fn unavailable_and_malformed_feeds_show_placeholders() {
        let state = state_with(vec![
            (Feed::TotalInventory, FeedState::Unavailable),
            (Feed::AvailableStorage, FeedState::Ready(json!({ "unexpected": true }))),
            (Feed::Forecast, FeedState::Ready(json!("not a list"))),
        ]);
        let values: Vec<String> = cards(&state).into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["N/A units", "N/A slots", "N/A"]);
    }

    #[test]
    fn warehouse_utilization_lists_each_warehouse() {
        let state = state_with(vec![(
            Feed::WarehouseUtilization,
            FeedState::Ready(json!({
                "warehouse_utilization": [
                    { "warehouse_id": "A", "utilization_percentage": "50.00%" },
                    { "warehouse_id": "B", "utilization_percentage": "20.00%" },
                    { "warehouse_id": "E", "utilization_percentage": "N/A" }
                ]
            })),
        )]);
        assert_eq!(
            cards(&state),
            vec![Card::new("Utilization by Warehouse", "A 50.00%, B 20.00%, E N/A")]
        );
    }

    #[test]
    fn warehouse_utilization_placeholders() {
        let state = state_with(vec![
            (Feed::WarehouseUtilization, FeedState::Ready(json!({ "warehouse_utilization": [] }))),
        ]);
        assert_eq!(cards(&state)[0].value, "No warehouses");

        let state = state_with(vec![(Feed::WarehouseUtilization, FeedState::Ready(json!({})))]);
        assert_eq!(cards(&state)[0].value, PLACEHOLDER);

        let state = state_with(vec![(Feed::WarehouseUtilization, FeedState::Unavailable)]);
        assert_eq!(cards(&state)[0].value, PLACEHOLDER);
    }

    #[test]
    fn warehouse_details_expand_per_warehouse() {
        let state = state_with(vec![(
            Feed::WarehouseDetails,
            FeedState::Ready(json!({
                "warehouses": [
                    { "warehouse_id": "A", "name": "Alpha", "total_stock": 50, "utilization_percentage": "50.00%" },
                    { "warehouse_id": "E", "name": "", "total_stock": 0, "utilization_percentage": "N/A" }
                ]
            })),
        )]);
        let cards = cards(&state);
        assert_eq!(cards[0], Card::new("Alpha", "50 units, 50.00% used"));
        assert_eq!(cards[1], Card::new("E", "0 units, N/A used"));
    }

    #[test]
    fn external_services_show_entry_counts() {
        let state = state_with(vec![
            (Feed::Forecast, FeedState::Ready(json!([{ "product_id": "P1" }, { "product_id": "P2" }]))),
            (
                Feed::Optimization,
                FeedState::Ready(json!({ "('A', 'B')": 10, "('B', 'C')": 4, "('C', 'A')": 1 })),
            ),
        ]);
        let values: Vec<String> = cards(&state).into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["2 forecasts", "3 recommendations"]);
    }

    #[test]
    fn text_rendering_aligns_titles() {
        let text = render_text(&[Card::new("A", "1"), Card::new("Longer", "2")]);
        assert_eq!(text, "A       1\nLonger  2\n");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }
}
