//! Derived proposal lists.
//!
//! Everything here is a pure function of its inputs: no store access, no
//! side effects, safe to call on every render.

use bairro_model::{Coordinate, FilterCriteria, Proposal};
use serde::Serialize;

/// Proposals matching `criteria`, in input order.
///
/// A proposal is kept when its category and status match (either may be the
/// wildcard) and, for a non-empty search term, the term appears in its
/// title, description or address, ignoring case.
pub fn apply<'a, I>(proposals: I, criteria: &FilterCriteria) -> Vec<&'a Proposal>
where
    I: IntoIterator<Item = &'a Proposal>,
{
    let needle = criteria.search.to_lowercase();
    proposals
        .into_iter()
        .filter(|p| matches(p, criteria, &needle))
        .collect()
}

fn matches(proposal: &Proposal, criteria: &FilterCriteria, needle: &str) -> bool {
    criteria.category.matches(&proposal.category)
        && criteria.status.matches(proposal.status)
        && (needle.is_empty()
            || [&proposal.title, &proposal.description, &proposal.address]
                .iter()
                .any(|field| field.to_lowercase().contains(needle)))
}

/// Proposals within `radius_km` of `center`, in input order.
pub fn within_radius<'a, I>(proposals: I, center: &Coordinate, radius_km: f64) -> Vec<&'a Proposal>
where
    I: IntoIterator<Item = &'a Proposal>,
{
    proposals
        .into_iter()
        .filter(|p| p.coordinate.distance_km(center) <= radius_km)
        .collect()
}

/// One page of a longer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Items across all pages
    pub total: usize,
    /// Number of pages (zero for an empty list)
    pub pages: usize,
    /// 1-based page number
    pub current_page: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Cut `items` into pages of `per_page` and return page `page` (1-based).
///
/// Page 0 is read as page 1. A page past the end has no items.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total = items.len();
    let pages = total.div_ceil(per_page);

    let items: Vec<T> = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        total,
        pages,
        current_page: page,
        has_next: page < pages,
        has_prev: page > 1,
    }
}
