use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pkg::internal::grading::Weights;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FakultasEntry {
    pub id: i64,
    pub nama: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramStudiEntry {
    pub id: i64,
    pub nama: String,
    pub id_unit_parent: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MataKuliahEntry {
    pub id: i64,
    pub kode_matkul: String,
    pub nama_matkul: String,
    pub sks: i32,
    pub id_program_studi: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const BOBOT_COLUMNS: &str = "id, id_program_studi, bobot_nilai_perusahaan, bobot_nilai_pembimbing, \
    bobot_nilai_penguji, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BobotNilaiEntry {
    pub id: i64,
    pub id_program_studi: i64,
    pub bobot_nilai_perusahaan: f64,
    pub bobot_nilai_pembimbing: f64,
    pub bobot_nilai_penguji: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BobotNilaiEntry {
    pub fn weights(&self) -> Weights {
        Weights::new(
            self.bobot_nilai_perusahaan,
            self.bobot_nilai_pembimbing,
            self.bobot_nilai_penguji,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KonversiEntry {
    pub id: i64,
    pub apply_job_id: i64,
    pub matkul_id: i64,
    pub grade: String,
    pub score: f64,
    pub kode_matkul: Option<String>,
    pub nama_matkul: Option<String>,
    pub sks: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const PERUSAHAAN_COLUMNS: &str = "id, nama_perusahaan, alamat_perusahaan, email_perusahaan, \
    website_perusahaan, facebook, instagram, tiktok, linkedin, user_id, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PerusahaanEntry {
    pub id: i64,
    pub nama_perusahaan: String,
    pub alamat_perusahaan: Option<String>,
    pub email_perusahaan: Option<String>,
    pub website_perusahaan: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub linkedin: Option<String>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerusahaanFields {
    pub nama_perusahaan: Option<String>,
    pub alamat_perusahaan: Option<String>,
    pub email_perusahaan: Option<String>,
    pub website_perusahaan: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub linkedin: Option<String>,
    pub user_id: Option<i64>,
}
