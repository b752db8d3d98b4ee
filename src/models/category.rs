use std::fmt;

/// The five aid programs a citizen can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionType {
    Umkm,
    Pendidikan,
    Kesehatan,
    Hukum,
    Sosial,
}

/// A table / export column backed by one or more form keys. Keys are aliases:
/// the first non-empty one wins.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub label: &'static str,
    pub keys: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Date,
    TextArea,
}

#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
}

const fn col(label: &'static str, keys: &'static [&'static str]) -> Column {
    Column { label, keys }
}

use InputKind::{Date, Number, Text, TextArea};

const fn field(name: &'static str, label: &'static str, kind: InputKind) -> FormField {
    FormField { name, label, kind }
}

impl SubmissionType {
    pub const ALL: [SubmissionType; 5] = [
        SubmissionType::Umkm,
        SubmissionType::Pendidikan,
        SubmissionType::Kesehatan,
        SubmissionType::Hukum,
        SubmissionType::Sosial,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Matches the backend `Type` field, ignoring case.
    pub fn matches(&self, kind: &str) -> bool {
        kind.trim().eq_ignore_ascii_case(self.api_name())
    }

    pub fn slug(&self) -> &'static str {
        match self {
            SubmissionType::Umkm => "umkm",
            SubmissionType::Pendidikan => "pendidikan",
            SubmissionType::Kesehatan => "kesehatan",
            SubmissionType::Hukum => "hukum",
            SubmissionType::Sosial => "sosial",
        }
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            SubmissionType::Umkm => "UMKM",
            SubmissionType::Pendidikan => "Pendidikan",
            SubmissionType::Kesehatan => "Kesehatan",
            SubmissionType::Hukum => "Hukum",
            SubmissionType::Sosial => "Sosial",
        }
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            SubmissionType::Hukum => "Bantuan Hukum",
            other => other.api_name(),
        }
    }

    pub fn page_title(&self) -> &'static str {
        match self {
            SubmissionType::Umkm => "Pengajuan UMKM",
            SubmissionType::Pendidikan => "Pengajuan Pendidikan",
            SubmissionType::Kesehatan => "Pengajuan Kesehatan",
            SubmissionType::Hukum => "Bantuan Hukum",
            SubmissionType::Sosial => "Pengajuan Sosial",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SubmissionType::Umkm => "fa-store",
            SubmissionType::Pendidikan => "fa-graduation-cap",
            SubmissionType::Kesehatan => "fa-heartbeat",
            SubmissionType::Hukum => "fa-balance-scale",
            SubmissionType::Sosial => "fa-hands-helping",
        }
    }

    /// Category-specific table columns, between applicant and document.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            SubmissionType::Umkm => UMKM_COLUMNS,
            SubmissionType::Pendidikan => PENDIDIKAN_COLUMNS,
            SubmissionType::Kesehatan => KESEHATAN_COLUMNS,
            SubmissionType::Hukum => HUKUM_COLUMNS,
            SubmissionType::Sosial => SOSIAL_COLUMNS,
        }
    }

    /// Fields shown in the detail modal. Wider than the table for some programs.
    pub fn detail_columns(&self) -> &'static [Column] {
        match self {
            SubmissionType::Umkm => UMKM_DETAIL,
            SubmissionType::Sosial => SOSIAL_DETAIL,
            other => other.columns(),
        }
    }

    /// Form columns of the spreadsheet export, after the applicant columns.
    pub fn export_columns(&self) -> &'static [Column] {
        match self {
            SubmissionType::Umkm => UMKM_EXPORT,
            other => other.columns(),
        }
    }

    /// Header of the applicant-name export column.
    pub fn export_name_label(&self) -> &'static str {
        match self {
            SubmissionType::Umkm => "Nama",
            _ => "Nama Pemohon",
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        self.nav_label()
    }

    pub fn export_file_stem(&self) -> &'static str {
        match self {
            SubmissionType::Hukum => "bantuan_hukum",
            other => other.slug(),
        }
    }

    pub fn form_title(&self) -> &'static str {
        match self {
            SubmissionType::Umkm => "Formulir Bantuan UMKM",
            SubmissionType::Pendidikan => "Formulir Bantuan Pendidikan",
            SubmissionType::Kesehatan => "Formulir Bantuan Kesehatan",
            SubmissionType::Hukum => "Formulir Bantuan Hukum",
            SubmissionType::Sosial => "Formulir Bantuan Sosial",
        }
    }

    pub fn form_description(&self) -> &'static str {
        match self {
            SubmissionType::Umkm => "Silakan isi detail usaha dan kebutuhan Anda.",
            SubmissionType::Pendidikan => "Isi detail siswa/mahasiswa dan jenis bantuan.",
            SubmissionType::Kesehatan => "Isi detail pasien dan kebutuhan bantuan kesehatan.",
            SubmissionType::Hukum => "Jelaskan permasalahan hukum yang Anda hadapi.",
            SubmissionType::Sosial => "Isi detail acara keagamaan atau sosial yang akan diadakan.",
        }
    }

    pub fn form_fields(&self) -> &'static [FormField] {
        match self {
            SubmissionType::Umkm => UMKM_FIELDS,
            SubmissionType::Pendidikan => PENDIDIKAN_FIELDS,
            SubmissionType::Kesehatan => KESEHATAN_FIELDS,
            SubmissionType::Hukum => HUKUM_FIELDS,
            SubmissionType::Sosial => SOSIAL_FIELDS,
        }
    }
}

const UMKM_COLUMNS: &[Column] = &[
    col("Nama Usaha", &["Nama Usaha"]),
    col("Jenis Usaha", &["Jenis Usaha"]),
    col("Kebutuhan", &["Uraian Kebutuhan Bantuan"]),
];

const PENDIDIKAN_COLUMNS: &[Column] = &[
    col("Nama Siswa/Mahasiswa", &["Nama Siswa/Mahasiswa"]),
    col("NISN/NIM", &["NISN/NIM"]),
    col("Sekolah/Universitas", &["Nama Sekolah/Kampus"]),
    col("Jenis Bantuan", &["Jenis Bantuan (PIP/KIP/Lainnya)"]),
];

const KESEHATAN_COLUMNS: &[Column] = &[
    col("Nama Pasien", &["Nama Pasien"]),
    col("NIK", &["NIK"]),
    col("Kebutuhan Bantuan", KESEHATAN_KEBUTUHAN),
    col("Keluhan", &["Keluhan Penyakit"]),
];

const HUKUM_COLUMNS: &[Column] = &[
    col("Kebutuhan Bantuan", &["Kebutuhan Bantuan"]),
    col("Pihak Terkait", &["Pihak Terkait"]),
    col("Uraian Masalah", &["Uraian Singkat Masalah"]),
];

const SOSIAL_COLUMNS: &[Column] = &[
    col("Nama Acara", &["Nama Acara"]),
    col("Lokasi Acara", &["Lokasi Acara"]),
    col("Deskripsi Singkat", &["Deskripsi Singkat Proposal"]),
];

const UMKM_DETAIL: &[Column] = &[
    col("Nama Usaha", &["Nama Usaha"]),
    col("Jenis Usaha", &["Jenis Usaha"]),
    col("Alamat Usaha", &["Alamat Usaha"]),
    col("Kebutuhan", &["Uraian Kebutuhan Bantuan"]),
];

const SOSIAL_DETAIL: &[Column] = &[
    col("Nama Acara", &["Nama Acara"]),
    col("Tanggal Pelaksanaan", &["Tanggal Pelaksanaan"]),
    col("Lokasi Acara", &["Lokasi Acara"]),
    col("Deskripsi", &["Deskripsi Singkat Proposal"]),
];

const UMKM_EXPORT: &[Column] = &[
    col("Nama Usaha", &["Nama Usaha"]),
    col("Jenis Usaha", &["Jenis Usaha"]),
    col("Alamat Usaha", &["Alamat Usaha"]),
    col("Kebutuhan Bantuan", &["Uraian Kebutuhan Bantuan"]),
];

const UMKM_FIELDS: &[FormField] = &[
    field("Nama Usaha", "Nama Usaha", Text),
    field("Jenis Usaha", "Jenis Usaha (Kuliner, Fashion, dll)", Text),
    field("Alamat Usaha", "Alamat Usaha", TextArea),
    field("Uraian Kebutuhan Bantuan", "Uraian Kebutuhan Bantuan", TextArea),
];

const PENDIDIKAN_FIELDS: &[FormField] = &[
    field("Nama Siswa/Mahasiswa", "Nama Siswa/Mahasiswa", Text),
    field("NISN/NIM", "NISN/NIM", Text),
    field("Nama Sekolah/Kampus", "Nama Sekolah/Kampus", Text),
    field(
        "Jenis Bantuan (PIP/KIP/Lainnya)",
        "Jenis Bantuan (PIP/KIP/Lainnya)",
        Text,
    ),
];

const KESEHATAN_FIELDS: &[FormField] = &[
    field("Nama Pasien", "Nama Pasien", Text),
    field("NIK", "NIK", Number),
    field("Keluhan Penyakit", "Keluhan Penyakit", TextArea),
    field(
        "Kebutuhan Bantuan (Biaya/Ambulance)",
        "Kebutuhan Bantuan (Biaya/Ambulance)",
        Text,
    ),
];

const HUKUM_FIELDS: &[FormField] = &[
    field("Uraian Singkat Masalah", "Uraian Singkat Masalah", TextArea),
    field("Pihak Terkait", "Pihak Terkait (Jika Ada)", Text),
    field("Kebutuhan Bantuan", "Kebutuhan Bantuan", Text),
];

const SOSIAL_FIELDS: &[FormField] = &[
    field("Nama Acara", "Nama Acara/Kegiatan", Text),
    field("Tanggal Pelaksanaan", "Tanggal Pelaksanaan", Date),
    field("Lokasi Acara", "Lokasi Acara", TextArea),
    field("Deskripsi Singkat Proposal", "Deskripsi Singkat Proposal", TextArea),
];

// The citizen form stores the long label; older records use the short one.
const KESEHATAN_KEBUTUHAN: &[&str] = &["Kebutuhan Bantuan", "Kebutuhan Bantuan (Biaya/Ambulance)"];

impl InputKind {
    pub fn html_type(&self) -> &'static str {
        match self {
            InputKind::Text | InputKind::TextArea => "text",
            InputKind::Number => "number",
            InputKind::Date => "date",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}
