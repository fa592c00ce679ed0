use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Chore, ChoreStatus, Member};

/// Per-member workload standing, derived fresh from the chore set on every
/// computation. `completed_count + pending_count` is the member's total
/// assigned chores; `overdue_count` never exceeds `pending_count`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberFairnessStat {
    pub member_id: String,
    pub display_name: String,
    pub completed_count: u32,
    pub pending_count: u32,
    pub overdue_count: u32,
    pub score: i64,
    pub share_percent: f64,
}

/// One consistent view over a group's chores. Keyed by member id; the map is
/// ordered so identical inputs serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessSnapshot {
    pub stats: BTreeMap<String, MemberFairnessStat>,
    pub total_score: i64,
}

impl FairnessSnapshot {
    pub fn empty() -> Self {
        Self {
            stats: BTreeMap::new(),
            total_score: 0,
        }
    }

    /// Stats ranked by score descending, ties broken by member id ascending.
    pub fn ranked(&self) -> Vec<&MemberFairnessStat> {
        let mut ranked: Vec<&MemberFairnessStat> = self.stats.values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });
        ranked
    }
}

/// Scores every member of a group from one read of its chore set.
///
/// `score = completed − overdue`: finishing chores puts a member ahead,
/// sitting on overdue ones puts them behind, and pending-but-not-yet-due
/// chores are neutral. Chores assigned to nobody (or to an id not in
/// `members`) contribute to no one's stats. `now` is an input so the same
/// data always produces the same snapshot.
pub fn compute_fairness(
    members: &[Member],
    chores: &[Chore],
    now: DateTime<Utc>,
) -> FairnessSnapshot {
    let mut stats: BTreeMap<String, MemberFairnessStat> = BTreeMap::new();
    for member in members {
        stats
            .entry(member.id.clone())
            .or_insert_with(|| MemberFairnessStat {
                member_id: member.id.clone(),
                display_name: member.display_name.clone(),
                completed_count: 0,
                pending_count: 0,
                overdue_count: 0,
                score: 0,
                share_percent: 0.0,
            });
    }

    for chore in chores {
        let Some(assignee) = &chore.assigned_to else {
            continue;
        };
        let Some(stat) = stats.get_mut(assignee) else {
            continue;
        };
        match chore.status {
            ChoreStatus::Completed => stat.completed_count += 1,
            ChoreStatus::Pending => {
                stat.pending_count += 1;
                if is_overdue(chore.due_date.as_deref(), now) {
                    stat.overdue_count += 1;
                }
            }
        }
    }

    let mut total_score = 0i64;
    for stat in stats.values_mut() {
        stat.score = i64::from(stat.completed_count) - i64::from(stat.overdue_count);
        total_score += stat.score.max(0);
    }

    // Negative scores are clamped to zero for display shares; if nobody has a
    // positive score the share is split equally instead of dividing by zero.
    if total_score > 0 {
        for stat in stats.values_mut() {
            stat.share_percent = stat.score.max(0) as f64 / total_score as f64 * 100.0;
        }
    } else if !stats.is_empty() {
        let equal = 100.0 / stats.len() as f64;
        for stat in stats.values_mut() {
            stat.share_percent = equal;
        }
    }

    FairnessSnapshot { stats, total_score }
}

/// A chore with no due date, or one the parser cannot read, never counts as
/// overdue; bad data must not block the whole computation.
fn is_overdue(due_date: Option<&str>, now: DateTime<Utc>) -> bool {
    let Some(raw) = due_date else {
        return false;
    };
    match parse_due_date(raw) {
        Some(due) => due < now,
        None => false,
    }
}

/// Accepts RFC 3339 instants and plain `YYYY-MM-DD` dates. A plain date is
/// due for the whole of that day and rolls over to overdue at its end.
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc())
}
