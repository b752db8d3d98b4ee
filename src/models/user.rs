use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::submission::{lenient_text, lenient_time};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID", default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default)]
    pub card_uid: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(default)]
    pub wilayah_tugas: Option<String>,
    #[serde(default)]
    pub provinsi: Option<String>,
    #[serde(default)]
    pub kabupaten: Option<String>,
    #[serde(default)]
    pub kecamatan: Option<String>,
    #[serde(default)]
    pub kelurahan: Option<String>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub email_verified_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }

    /// Searchable text fields, in the order they show up in the table.
    pub fn search_fields(&self) -> [Option<&str>; 8] {
        [
            Some(self.full_name.as_str()),
            Some(self.email.as_str()),
            self.card_uid.as_deref(),
            self.phone.as_deref(),
            self.provinsi.as_deref(),
            self.kabupaten.as_deref(),
            self.kecamatan.as_deref(),
            self.kelurahan.as_deref(),
        ]
    }

    /// `****1234` style display of the linked card.
    pub fn masked_card(&self) -> Option<String> {
        let uid = self.card_uid.as_deref().filter(|s| !s.is_empty())?;
        let tail: String = {
            let chars: Vec<char> = uid.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        };
        Some(format!("****{tail}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    User,
    AdminWilayah,
    SuperAdmin,
    /// Older accounts carry a bare `admin` role.
    Admin,
    Other(String),
}

impl Role {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "user" | "" => Role::User,
            "admin_wilayah" => Role::AdminWilayah,
            "super_admin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::AdminWilayah => "admin_wilayah",
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Other(s) => s,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::AdminWilayah | Role::SuperAdmin | Role::Admin)
    }

    pub fn label(&self) -> &str {
        match self {
            Role::User => "User",
            Role::AdminWilayah => "Admin Wilayah",
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::Other(s) => s,
        }
    }
}

/// Roles an administrator can assign from the user management page.
pub const ASSIGNABLE_ROLES: [Role; 3] = [Role::User, Role::AdminWilayah, Role::SuperAdmin];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_anggota_aktif: i64,
    #[serde(default)]
    pub pelaku_umkm: i64,
    #[serde(default)]
    pub pengajuan_menunggu: i64,
    #[serde(default)]
    pub total_saldo_emoney: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Village {
    pub code: String,
    pub name: String,
}
