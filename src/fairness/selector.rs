use crate::error::AppError;
use crate::fairness::scorer::FairnessSnapshot;
use crate::models::Member;

/// Picks the member who should receive the next unassigned chore: lowest
/// score first, then fewest total assigned chores, then smallest member id.
/// The result is a recommendation only; recording the assignment is the
/// caller's job.
pub fn select_assignee(snapshot: &FairnessSnapshot, members: &[Member]) -> Result<Member, AppError> {
    members
        .iter()
        .min_by_key(|member| {
            let (score, total) = snapshot
                .stats
                .get(&member.id)
                .map(|s| (s.score, s.completed_count + s.pending_count))
                .unwrap_or((0, 0));
            (score, total, member.id.clone())
        })
        .cloned()
        .ok_or(AppError::EmptyGroup)
}
