//! Dashboard statistics.
//!
//! A pure summary of a proposal collection. Percentages divide by the total
//! number of proposals and read as 0 when there are none.

use bairro_model::{CategoryCatalog, Priority, Proposal, ProposalStatus};
use serde::Serialize;

/// Proposal counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub pending: usize,
    pub approved: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub rejected: usize,
}

impl StatusBreakdown {
    pub fn get(&self, status: ProposalStatus) -> usize {
        match status {
            ProposalStatus::Pending => self.pending,
            ProposalStatus::Approved => self.approved,
            ProposalStatus::InProgress => self.in_progress,
            ProposalStatus::Completed => self.completed,
            ProposalStatus::Rejected => self.rejected,
        }
    }

    fn record(&mut self, status: ProposalStatus) {
        let slot = match status {
            ProposalStatus::Pending => &mut self.pending,
            ProposalStatus::Approved => &mut self.approved,
            ProposalStatus::InProgress => &mut self.in_progress,
            ProposalStatus::Completed => &mut self.completed,
            ProposalStatus::Rejected => &mut self.rejected,
        };
        *slot += 1;
    }
}

/// Proposal counts by priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityBreakdown {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn record(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

/// Activity in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Proposals in the category
    pub count: usize,
    /// Votes across those proposals
    pub votes: u64,
}

/// Everything the reports view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: StatusBreakdown,
    pub by_priority: PriorityBreakdown,
    pub total_votes: u64,
    pub total_comments: u64,
    /// Every catalog category, busiest first
    pub categories: Vec<CategoryStat>,
    /// Newest proposals first
    pub recent: Vec<Proposal>,
}

impl DashboardStats {
    /// Share of proposals with `status`, in percent.
    pub fn status_share(&self, status: ProposalStatus) -> f64 {
        percentage(self.by_status.get(status), self.total)
    }

    /// Share of proposals with `priority`, in percent.
    pub fn priority_share(&self, priority: Priority) -> f64 {
        percentage(self.by_priority.get(priority), self.total)
    }

    /// Share of proposals in a category, in percent.
    pub fn category_share(&self, category_id: &str) -> f64 {
        let count = self
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .map_or(0, |c| c.count);
        percentage(count, self.total)
    }

    /// The `limit` busiest categories.
    pub fn top_categories(&self, limit: usize) -> &[CategoryStat] {
        &self.categories[..limit.min(self.categories.len())]
    }
}

/// `part / total` as a percentage; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Summarize `proposals` for the dashboard.
///
/// Categories keep catalog order among equal counts. Recent proposals are
/// ordered by creation time, newest first; equal timestamps keep input order.
pub fn summarize<'a, I>(
    proposals: I,
    catalog: &CategoryCatalog,
    recent_limit: usize,
) -> DashboardStats
where
    I: IntoIterator<Item = &'a Proposal>,
{
    let proposals: Vec<&Proposal> = proposals.into_iter().collect();

    let mut by_status = StatusBreakdown::default();
    let mut by_priority = PriorityBreakdown::default();
    let mut total_votes = 0u64;
    let mut total_comments = 0u64;

    for proposal in &proposals {
        by_status.record(proposal.status);
        by_priority.record(proposal.priority);
        total_votes += u64::from(proposal.votes_count);
        total_comments += u64::from(proposal.comments_count);
    }

    let mut categories: Vec<CategoryStat> = catalog
        .iter()
        .map(|category| {
            let (count, votes) = proposals
                .iter()
                .filter(|p| p.category == category.id)
                .fold((0usize, 0u64), |(count, votes), p| {
                    (count + 1, votes + u64::from(p.votes_count))
                });
            CategoryStat {
                id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                count,
                votes,
            }
        })
        .collect();
    // Stable sort keeps catalog order for ties
    categories.sort_by(|a, b| b.count.cmp(&a.count));

    let mut recent = proposals.clone();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent = recent.into_iter().take(recent_limit).cloned().collect();

    DashboardStats {
        total: proposals.len(),
        by_status,
        by_priority,
        total_votes,
        total_comments,
        categories,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bairro_model::{Coordinate, ProposalId, UserId};
    use chrono::{DateTime, Duration, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_736_500_000, 0).unwrap() + Duration::minutes(minutes)
    }

    fn proposal(
        id: &str,
        category: &str,
        status: ProposalStatus,
        created: i64,
        votes: u32,
    ) -> Proposal {
        Proposal {
            id: ProposalId::new(id),
            title: id.to_string(),
            description: String::new(),
            address: String::new(),
            category: category.to_string(),
            coordinate: Coordinate::new(0.0, 0.0),
            status,
            priority: Priority::Medium,
            votes_count: votes,
            comments_count: 1,
            author_id: UserId::new("u"),
            author_name: "u".to_string(),
            created_at: at(created),
            updated_at: at(created),
        }
    }

    #[test]
    fn test_empty_collection_reports_zero() {
        let stats = summarize(Vec::<&Proposal>::new(), &CategoryCatalog::default(), 5);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_votes, 0);
        assert!(stats.recent.is_empty());
        assert_eq!(stats.categories.len(), 8);
        for status in ProposalStatus::ALL {
            assert_eq!(stats.status_share(status), 0.0);
        }
        for priority in Priority::ALL {
            assert_eq!(stats.priority_share(priority), 0.0);
        }
        assert_eq!(stats.category_share("lazer"), 0.0);
    }

    #[test]
    fn test_breakdowns_and_totals() {
        let proposals = vec![
            proposal("a", "lazer", ProposalStatus::Pending, 0, 3),
            proposal("b", "lazer", ProposalStatus::Completed, 1, 2),
            proposal("c", "transporte", ProposalStatus::Pending, 2, 5),
            proposal("d", "seguranca", ProposalStatus::InProgress, 3, 0),
        ];
        let stats = summarize(&proposals, &CategoryCatalog::default(), 5);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_status.pending, 2);
        assert_eq!(stats.by_status.completed, 1);
        assert_eq!(stats.by_status.in_progress, 1);
        assert_eq!(stats.by_priority.medium, 4);
        assert_eq!(stats.total_votes, 10);
        assert_eq!(stats.total_comments, 4);
        assert_eq!(stats.status_share(ProposalStatus::Pending), 50.0);

        let top = stats.top_categories(3);
        assert_eq!(top[0].id, "lazer");
        assert_eq!(top[0].votes, 5);
        // transporte and seguranca tie at 1; catalog order puts seguranca first
        assert_eq!(top[1].id, "seguranca");
        assert_eq!(top[2].id, "transporte");
    }

    #[test]
    fn test_recent_limit_and_ties() {
        let proposals = vec![
            proposal("newest", "lazer", ProposalStatus::Pending, 10, 0),
            proposal("tie-first", "lazer", ProposalStatus::Pending, 5, 0),
            proposal("tie-second", "lazer", ProposalStatus::Pending, 5, 0),
            proposal("old", "lazer", ProposalStatus::Pending, 1, 0),
            proposal("older", "lazer", ProposalStatus::Pending, 0, 0),
            proposal("oldest", "lazer", ProposalStatus::Pending, -5, 0),
        ];
        // Input deliberately not in time order for the last two
        let shuffled: Vec<&Proposal> = [0, 1, 2, 5, 3, 4].iter().map(|&i| &proposals[i]).collect();

        let stats = summarize(shuffled, &CategoryCatalog::default(), 5);
        let ids: Vec<_> = stats.recent.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["newest", "tie-first", "tie-second", "old", "older"]);
    }

    #[test]
    fn test_percentage_guard() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
