use sqlx::PgConnection;

use crate::pkg::internal::adaptors::master::spec::{
    BOBOT_COLUMNS, BobotNilaiEntry, FakultasEntry, KonversiEntry, MataKuliahEntry, PERUSAHAAN_COLUMNS,
    PerusahaanEntry, ProgramStudiEntry,
};
use crate::prelude::Result;

pub(super) const KONVERSI_SELECT: &str = "SELECT k.id, k.apply_job_id, k.matkul_id, k.grade, k.score, \
    m.kode_matkul, m.nama_matkul, m.sks, k.created_at, k.updated_at \
    FROM konversi_nilai k LEFT JOIN mata_kuliah m ON m.id = k.matkul_id";

pub struct AcademicSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> AcademicSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        AcademicSelector { pool }
    }

    pub async fn fakultas(&mut self, limit: i64, offset: i64) -> Result<(Vec<FakultasEntry>, i64)> {
        let rows = sqlx::query_as::<_, FakultasEntry>(
            "SELECT id, nama, created_at, updated_at FROM fakultas ORDER BY nama LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fakultas")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok((rows, count))
    }

    pub async fn program_studi(
        &mut self,
        fakultas_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProgramStudiEntry>, i64)> {
        let rows = sqlx::query_as::<_, ProgramStudiEntry>(
            "SELECT id, nama, id_unit_parent, created_at, updated_at FROM program_studi
             WHERE ($1::bigint IS NULL OR id_unit_parent = $1)
             ORDER BY nama LIMIT $2 OFFSET $3",
        )
        .bind(fakultas_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM program_studi WHERE ($1::bigint IS NULL OR id_unit_parent = $1)",
        )
        .bind(fakultas_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok((rows, count))
    }

    pub async fn mata_kuliah(
        &mut self,
        prodi_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<MataKuliahEntry>, i64)> {
        let rows = sqlx::query_as::<_, MataKuliahEntry>(
            "SELECT id, kode_matkul, nama_matkul, sks, id_program_studi, created_at, updated_at
             FROM mata_kuliah WHERE ($1::bigint IS NULL OR id_program_studi = $1)
             ORDER BY kode_matkul LIMIT $2 OFFSET $3",
        )
        .bind(prodi_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM mata_kuliah WHERE ($1::bigint IS NULL OR id_program_studi = $1)",
        )
        .bind(prodi_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok((rows, count))
    }
}

pub struct BobotSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> BobotSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        BobotSelector { pool }
    }

    pub async fn for_prodi(&mut self, prodi_id: i64) -> Result<Option<BobotNilaiEntry>> {
        let row = sqlx::query_as::<_, BobotNilaiEntry>(&format!(
            "SELECT {} FROM bobot_nilai WHERE id_program_studi = $1",
            BOBOT_COLUMNS
        ))
        .bind(prodi_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn first_configured(&mut self) -> Result<Option<BobotNilaiEntry>> {
        let row = sqlx::query_as::<_, BobotNilaiEntry>(&format!(
            "SELECT {} FROM bobot_nilai ORDER BY id LIMIT 1",
            BOBOT_COLUMNS
        ))
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Weights of the applicant's program, or the first configured set when
    /// the program has none.
    pub async fn for_application(&mut self, apply_job_id: i64) -> Result<Option<BobotNilaiEntry>> {
        let row = sqlx::query_as::<_, BobotNilaiEntry>(
            "SELECT b.id, b.id_program_studi, b.bobot_nilai_perusahaan, b.bobot_nilai_pembimbing,
                    b.bobot_nilai_penguji, b.created_at, b.updated_at
             FROM apply_job_user aju
             JOIN users u ON u.id = aju.user_id
             JOIN bobot_nilai b ON b.id_program_studi = u.id_program_studi
             WHERE aju.apply_job_id = $1
             ORDER BY aju.user_id LIMIT 1",
        )
        .bind(apply_job_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        match row {
            Some(row) => Ok(Some(row)),
            None => self.first_configured().await,
        }
    }
}

pub struct KonversiSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> KonversiSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        KonversiSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<KonversiEntry>> {
        let row = sqlx::query_as::<_, KonversiEntry>(&format!("{} WHERE k.id = $1", KONVERSI_SELECT))
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(&mut self, apply_job_id: Option<i64>) -> Result<Vec<KonversiEntry>> {
        let rows = sqlx::query_as::<_, KonversiEntry>(&format!(
            "{} WHERE ($1::bigint IS NULL OR k.apply_job_id = $1) ORDER BY k.id",
            KONVERSI_SELECT
        ))
        .bind(apply_job_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct PerusahaanSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> PerusahaanSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        PerusahaanSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<PerusahaanEntry>> {
        let row = sqlx::query_as::<_, PerusahaanEntry>(&format!(
            "SELECT {} FROM perusahaans WHERE id = $1",
            PERUSAHAAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&mut self, limit: i64, offset: i64) -> Result<(Vec<PerusahaanEntry>, i64)> {
        let rows = sqlx::query_as::<_, PerusahaanEntry>(&format!(
            "SELECT {} FROM perusahaans ORDER BY id DESC LIMIT $1 OFFSET $2",
            PERUSAHAAN_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM perusahaans")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok((rows, count))
    }
}
