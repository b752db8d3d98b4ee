use std::fmt;

use crate::models::Role;

/// Canonical submission status. The backend stores free text in two languages;
/// everything is folded into this set before filtering or styling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Review,
    ValidasiBerkas,
    Approved,
    Rejected,
    Unknown,
    /// Unrecognized text, lowercased and kept as-is.
    Other(String),
}

impl Status {
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Status::Unknown;
        };

        let s = raw.to_lowercase();
        match s.as_str() {
            "approved" | "disetujui" => Status::Approved,
            "rejected" | "ditolak" => Status::Rejected,
            "review" | "pending" => Status::Review,
            "validasi berkas" | "diverifikasi" => Status::ValidasiBerkas,
            "unknown" => Status::Unknown,
            _ => Status::Other(s),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Review => "review",
            Status::ValidasiBerkas => "validasi berkas",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
            Status::Unknown => "unknown",
            Status::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Status::Review => "Review",
            Status::ValidasiBerkas => "Validasi Berkas",
            Status::Approved => "Disetujui",
            Status::Rejected => "Ditolak",
            Status::Unknown => "Tidak Diketahui",
            Status::Other(s) => s,
        }
    }

    /// CSS class of the status badge.
    pub fn badge_class(&self) -> String {
        self.as_str().replace(' ', "-")
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Approved | Status::Rejected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin buttons in the detail modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    ValidasiBerkas,
    Approve,
    Reject,
}

impl StatusAction {
    pub const ALL: [StatusAction; 3] = [
        StatusAction::ValidasiBerkas,
        StatusAction::Approve,
        StatusAction::Reject,
    ];

    /// Form value of the button.
    pub fn key(&self) -> &'static str {
        match self {
            StatusAction::ValidasiBerkas => "validasi",
            StatusAction::Approve => "setujui",
            StatusAction::Reject => "tolak",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    /// Status text posted to the backend.
    pub fn status(&self) -> &'static str {
        match self {
            StatusAction::ValidasiBerkas => "validasi berkas",
            StatusAction::Approve => "disetujui",
            StatusAction::Reject => "ditolak",
        }
    }

    pub fn notes(&self) -> &'static str {
        match self {
            StatusAction::ValidasiBerkas => "Berkas telah divalidasi",
            StatusAction::Approve => "Pengajuan disetujui",
            StatusAction::Reject => "Pengajuan ditolak",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusAction::ValidasiBerkas => "Validasi Berkas",
            StatusAction::Approve => "Setujui",
            StatusAction::Reject => "Tolak",
        }
    }

    pub fn button_class(&self) -> &'static str {
        match self {
            StatusAction::ValidasiBerkas => "btn-warning",
            StatusAction::Approve => "btn-success",
            StatusAction::Reject => "btn-danger",
        }
    }
}

/// Buttons offered for a record. Only hides what makes no sense to click;
/// the backend decides what is actually allowed.
pub fn available_actions(status: &Status, role: &Role) -> Vec<StatusAction> {
    if !role.is_admin() || status.is_terminal() {
        return Vec::new();
    }

    match status {
        Status::ValidasiBerkas => vec![StatusAction::Approve, StatusAction::Reject],
        _ => StatusAction::ALL.to_vec(),
    }
}
