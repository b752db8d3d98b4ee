use crate::models::{Submission, User};

use super::status::Status;

/// Status filter buttons of the category pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(Status),
}

impl StatusFilter {
    /// Button order on the page.
    pub fn choices() -> [StatusFilter; 5] {
        [
            StatusFilter::All,
            StatusFilter::Only(Status::Review),
            StatusFilter::Only(Status::ValidasiBerkas),
            StatusFilter::Only(Status::Approved),
            StatusFilter::Only(Status::Rejected),
        ]
    }

    /// `all`, missing or blank selects everything; any other value is normalized.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => StatusFilter::All,
            Some(s) if s.eq_ignore_ascii_case("all") => StatusFilter::All,
            Some(s) => StatusFilter::Only(Status::normalize(Some(s))),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatusFilter::All => "Semua",
            StatusFilter::Only(status) => status.label(),
        }
    }

    pub fn accepts(&self, submission: &Submission) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => {
                Status::normalize(submission.status.as_deref()) == *status
            }
        }
    }
}

/// The subset matching `filter`, in the order it was loaded.
pub fn filter_by_status<'a>(items: &'a [Submission], filter: &StatusFilter) -> Vec<&'a Submission> {
    items.iter().filter(|s| filter.accepts(s)).collect()
}

/// Stat cards above each category table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub review: usize,
    pub validasi_berkas: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally<'a>(items: impl IntoIterator<Item = &'a Submission>) -> Self {
        let mut counts = StatusCounts::default();
        for item in items {
            counts.total += 1;
            match Status::normalize(item.status.as_deref()) {
                Status::Review => counts.review += 1,
                Status::ValidasiBerkas => counts.validasi_berkas += 1,
                Status::Approved => counts.approved += 1,
                Status::Rejected => counts.rejected += 1,
                Status::Unknown | Status::Other(_) => {}
            }
        }
        counts
    }
}

/// Role + free-text filter of the user management page.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<String>,
    pub search: Option<String>,
}

impl UserFilter {
    pub fn new(role: Option<&str>, search: Option<&str>) -> Self {
        let role = role
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty() && r != "all");
        let search = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        Self { role, search }
    }

    pub fn accepts(&self, user: &User) -> bool {
        if let Some(role) = &self.role {
            if user.role.to_lowercase() != *role {
                return false;
            }
        }

        match &self.search {
            None => true,
            Some(key) => user
                .search_fields()
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(key.as_str())),
        }
    }

    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.accepts(u)).collect()
    }
}
