//! Mock providers. Each screen owns its own store; these seed it once at
//! mount. Both `player` shapes (plain string and `{ username }`) are
//! represented on purpose.

use crate::engine::types::Record;
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

/// The fetch-like provider variant: a JSON array of record objects.
pub fn records_from_json(raw: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(raw).context("fixture is not valid JSON")?;
    let Value::Array(items) = value else {
        bail!("fixture must be a JSON array of records");
    };
    Ok(items.into_iter().map(Record::from_value).collect())
}

pub fn bets() -> Vec<Record> {
    [
        json!({"id": 1, "player": {"username": "JohnDoe"}, "flightNumber": "AV101",
               "amount": 500, "multiplier": 2.5, "payout": 1250,
               "date": "2025-06-21T10:15:00Z", "status": "won"}),
        json!({"id": 2, "player": {"username": "JaneSmith"}, "flightNumber": "AV102",
               "amount": 1000, "multiplier": 0, "payout": 0,
               "date": "2025-06-20T11:00:00Z", "status": "lost"}),
        json!({"id": 3, "player": {"username": "LuckyPlayer"}, "flightNumber": "AV103",
               "amount": 200, "multiplier": 5, "payout": 1000,
               "date": "2025-06-18T14:45:00Z", "status": "won"}),
        json!({"id": 4, "player": "SkyHigh", "flightNumber": "AV104",
               "amount": 750, "multiplier": 3.0, "payout": 2250,
               "date": "2025-06-17T16:30:00Z", "status": "won"}),
        json!({"id": 5, "player": "SkyHigh", "flightNumber": "AV105",
               "amount": 300, "multiplier": 0, "payout": 0,
               "date": "2025-06-21T09:00:00Z", "status": "lost"}),
    ]
    .into_iter()
    .map(Record::from_value)
    .collect()
}

pub fn payouts() -> Vec<Record> {
    [
        json!({"id": 1, "player": {"username": "JohnDoe"}, "amount": 1250,
               "method": "paypal", "status": "completed",
               "createdAt": "2025-06-21T11:00:00Z"}),
        json!({"id": 2, "player": "SkyHigh", "amount": 2250,
               "method": "bank", "status": "pending",
               "createdAt": "2025-06-18T09:30:00Z",
               "note": "Manual review: first payout above 2000"}),
        json!({"id": 3, "player": {"username": "LuckyPlayer"}, "amount": 1000,
               "method": "crypto", "status": "failed",
               "createdAt": "2025-06-19T18:45:00Z",
               "note": "Wallet address rejected"}),
        json!({"id": 4, "player": {"username": "JaneSmith"}, "amount": 400,
               "method": "paypal", "status": "pending",
               "createdAt": "2025-06-21T08:10:00Z"}),
    ]
    .into_iter()
    .map(Record::from_value)
    .collect()
}

pub fn flights() -> Vec<Record> {
    [
        json!({"id": 1, "flightNumber": "AV101", "multiplier": "1.8",
               "timestamp": "2025-06-21 10:15:00", "duration": "30s", "players": 12,
               "startTime": "2025-06-21T10:15:00Z", "flightPlan": true}),
        json!({"id": 2, "flightNumber": "AV102", "multiplier": "2.5",
               "timestamp": "2025-06-20 11:00:00", "duration": "45s", "players": 18,
               "startTime": "2025-06-20T11:00:00Z", "flightPlan": true}),
        json!({"id": 3, "flightNumber": "AV103", "multiplier": "4.3",
               "timestamp": "2025-06-18 14:45:00", "duration": "60s", "players": 24,
               "startTime": "2025-06-18T14:45:00Z", "flightPlan": true}),
        json!({"id": 4, "flightNumber": "AV104", "multiplier": "3.0",
               "timestamp": "2025-06-17 16:30:00", "duration": "40s", "players": 20,
               "startTime": "2025-06-17T16:30:00Z", "flightPlan": true}),
        json!({"id": 5, "flightNumber": "AV105", "multiplier": "1.2",
               "timestamp": "2025-06-21 09:00:00", "duration": "25s", "players": 10,
               "startTime": "2025-06-21T09:00:00Z", "flightPlan": true}),
        // Aborted round: no flight plan, filtered out at screen mount.
        json!({"id": 6, "flightNumber": "AV106", "multiplier": "0.0",
               "timestamp": "2025-06-21 09:30:00", "duration": "2s", "players": 3,
               "startTime": "2025-06-21T09:30:00Z", "flightPlan": false}),
    ]
    .into_iter()
    .map(Record::from_value)
    .collect()
}

pub fn flight_plans() -> Vec<Record> {
    [
        json!({"id": 1, "name": "Flight Alpha", "description": "Initial Test Flight",
               "isActive": true}),
        json!({"id": 2, "name": "Flight Beta", "description": "Secondary Run",
               "isActive": false}),
    ]
    .into_iter()
    .map(Record::from_value)
    .collect()
}
