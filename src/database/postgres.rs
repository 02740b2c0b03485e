use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::models::Programmer;
use super::store::{ProgrammerStore, StoreError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS programmers (
        seq BIGSERIAL,
        id UUID PRIMARY KEY,
        nickname TEXT NOT NULL UNIQUE,
        avatar_number INTEGER,
        tag_line TEXT,
        power_level INTEGER NOT NULL DEFAULT 0,
        user_id UUID NOT NULL
    )
"#;

const SELECT_COLUMNS: &str = "SELECT id, nickname, avatar_number, tag_line, power_level, user_id FROM programmers";

#[derive(Debug, FromRow)]
struct ProgrammerRow {
    id: Uuid,
    nickname: String,
    avatar_number: Option<i32>,
    tag_line: Option<String>,
    power_level: i32,
    user_id: Uuid,
}

impl From<ProgrammerRow> for Programmer {
    fn from(row: ProgrammerRow) -> Self {
        Programmer {
            id: Some(row.id),
            nickname: Some(row.nickname),
            avatar_number: row.avatar_number,
            tag_line: row.tag_line,
            power_level: row.power_level,
            owner_id: Some(row.user_id),
        }
    }
}

/// PostgreSQL-backed programmer store
pub struct PgProgrammerStore {
    pool: PgPool,
}

impl PgProgrammerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the programmers table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("Programmers table ready");
        Ok(())
    }

    async fn insert(&self, programmer: Programmer) -> Result<Programmer, StoreError> {
        let nickname = programmer
            .nickname
            .clone()
            .ok_or_else(|| StoreError::InvalidRecord("nickname is required".to_string()))?;
        let owner_id = programmer
            .owner_id
            .ok_or_else(|| StoreError::InvalidRecord("owner is required".to_string()))?;

        let row = sqlx::query_as::<_, ProgrammerRow>(
            r#"
            INSERT INTO programmers (id, nickname, avatar_number, tag_line, power_level, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, nickname, avatar_number, tag_line, power_level, user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nickname)
        .bind(programmer.avatar_number)
        .bind(&programmer.tag_line)
        .bind(programmer.power_level)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, programmer: Programmer) -> Result<Programmer, StoreError> {
        // nickname, power_level and user_id are not writable through this path
        let row = sqlx::query_as::<_, ProgrammerRow>(
            r#"
            UPDATE programmers
            SET avatar_number = $2, tag_line = $3
            WHERE id = $1
            RETURNING id, nickname, avatar_number, tag_line, power_level, user_id
            "#,
        )
        .bind(id)
        .bind(programmer.avatar_number)
        .bind(&programmer.tag_line)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Programmer::from).ok_or(StoreError::Missing(id))
    }
}

#[async_trait]
impl ProgrammerStore for PgProgrammerStore {
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Programmer>, StoreError> {
        let sql = format!("{} WHERE nickname = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, ProgrammerRow>(&sql)
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Programmer::from))
    }

    async fn find_all(&self) -> Result<Vec<Programmer>, StoreError> {
        let sql = format!("{} ORDER BY seq", SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, ProgrammerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Programmer::from).collect())
    }

    async fn save(&self, programmer: Programmer) -> Result<Programmer, StoreError> {
        match programmer.id {
            None => self.insert(programmer).await,
            Some(id) => self.update(id, programmer).await,
        }
    }

    async fn delete(&self, programmer: &Programmer) -> Result<(), StoreError> {
        let Some(id) = programmer.id else {
            return Ok(());
        };
        sqlx::query("DELETE FROM programmers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
