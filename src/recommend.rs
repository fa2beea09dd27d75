use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The financial priority a user asks advice for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityCategory {
    Savings,
    Investments,
    Expenses,
}

impl PriorityCategory {
    pub const ALL: [PriorityCategory; 3] = [
        PriorityCategory::Savings,
        PriorityCategory::Investments,
        PriorityCategory::Expenses,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PriorityCategory::Savings => "Savings",
            PriorityCategory::Investments => "Investments",
            PriorityCategory::Expenses => "Expenses",
        }
    }
}

impl fmt::Display for PriorityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority '{0}' (expected Savings, Investments or Expenses)")]
pub struct UnknownPriority(pub String);

impl FromStr for PriorityCategory {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PriorityCategory::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPriority(wanted.to_string()))
    }
}

/// Ordered advice for one priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationSet {
    pub priority: PriorityCategory,
    pub items: Vec<&'static str>,
}

/// Advice for `priority` from the fixed rule table.
///
/// The dataset does not influence the result yet; every call for the same
/// priority returns the same two strings in the same order.
pub fn recommend(priority: PriorityCategory) -> RecommendationSet {
    let items = match priority {
        PriorityCategory::Savings => vec![
            "Allocate 20% of your income to savings.",
            "Track your fixed expenses to maximize savings.",
        ],
        PriorityCategory::Investments => vec![
            "Explore SIPs and mutual funds for growth.",
            "Consider diversifying into low-risk bonds.",
        ],
        PriorityCategory::Expenses => vec![
            "Identify areas where overspending occurs.",
            "Set a monthly budget for each expense category.",
        ],
    };
    RecommendationSet { priority, items }
}
