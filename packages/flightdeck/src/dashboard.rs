//! Cross-store summary for the landing view: headline totals plus the two
//! small tables (recent bets, top players).

use crate::engine::aggregate::{aggregate, AggregateSpec, Reducer};
use crate::engine::accessor::{field_of, number_of, text_of};
use crate::engine::sort::{sort_records, SortConfig, SortDirection};
use crate::engine::types::{FieldPath, Record};
use serde::Serialize;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_bets: u64,
    pub total_payout_amount: f64,
    pub total_players: u64,
    pub total_flights: u64,
    pub total_payouts: u64,
    pub highest_win: f64,
    pub parse_warnings: usize,
}

#[instrument(skip_all)]
pub fn summarize(bets: &[Record], payouts: &[Record], flights: &[Record]) -> DashboardSummary {
    let bet_spec = AggregateSpec::new()
        .with("totalBets", Reducer::Count)
        .with("totalPlayers", Reducer::Distinct { field: FieldPath::new("player") })
        .with("highestWin", Reducer::Max { field: FieldPath::new("payout") });
    let payout_spec = AggregateSpec::new()
        .with("totalPayouts", Reducer::Count)
        .with("totalPayoutAmount", Reducer::Sum { field: FieldPath::new("amount") });

    let bet_summary = aggregate(bets, &bet_spec);
    let payout_summary = aggregate(payouts, &payout_spec);

    DashboardSummary {
        total_bets: bet_summary.get("totalBets") as u64,
        total_payout_amount: payout_summary.get("totalPayoutAmount"),
        total_players: bet_summary.get("totalPlayers") as u64,
        total_flights: flights.len() as u64,
        total_payouts: payout_summary.get("totalPayouts") as u64,
        highest_win: bet_summary.get("highestWin"),
        parse_warnings: bet_summary.parse_warnings + payout_summary.parse_warnings,
    }
}

/// Latest bets by date, newest first. Stable on equal timestamps.
pub fn recent_bets(bets: &[Record], limit: usize) -> Vec<Record> {
    let mut sorted = sort_records(
        bets.to_vec(),
        &SortConfig::new("date", SortDirection::Desc),
    );
    sorted.truncate(limit);
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayer {
    pub player: SmolStr,
    pub total_wins: u64,
    pub total_payout: f64,
}

/// Group bets by player (username fallback applies), rank by payout sum.
pub fn top_players(bets: &[Record], limit: usize) -> Vec<TopPlayer> {
    let player_path = FieldPath::new("player");
    let payout_path = FieldPath::new("payout");
    let status_path = FieldPath::new("status");

    // BTreeMap keeps the tie-break alphabetical and deterministic.
    let mut grouped: BTreeMap<String, TopPlayer> = BTreeMap::new();
    for bet in bets {
        let name = text_of(bet, &player_path);
        if name.is_empty() {
            continue;
        }
        let entry = grouped.entry(name.clone()).or_insert_with(|| TopPlayer {
            player: SmolStr::new(&name),
            total_wins: 0,
            total_payout: 0.0,
        });
        if field_of(bet, &status_path).and_then(|f| f.as_str()) == Some("won") {
            entry.total_wins += 1;
        }
        entry.total_payout += number_of(bet, &payout_path).0;
    }

    let mut players: Vec<TopPlayer> = grouped.into_values().collect();
    players.sort_by(|a, b| {
        b.total_payout
            .partial_cmp(&a.total_payout)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    players.truncate(limit);
    players
}
