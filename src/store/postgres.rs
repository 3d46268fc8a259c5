//! Postgres arm store. Every mutation is a single statement (or a single
//! transaction), so concurrent requests for the same learner partition
//! serialize at the database rather than in process memory.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use super::StoreError;
use crate::bandit::{Arm, ItemKind};

pub struct PgArmStore {
    pool: PgPool,
}

impl PgArmStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn ensure_arm(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "bandit_arms" ("learnerId", "itemType", "itemId")
            VALUES ($1, $2, $3)
            ON CONFLICT ("learnerId", "itemType", "itemId") DO NOTHING
            "#,
        )
        .bind(learner_id)
        .bind(kind.as_str())
        .bind(item_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_arm(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<Option<Arm>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT * FROM "bandit_arms"
            WHERE "learnerId" = $1 AND "itemType" = $2 AND "itemId" = $3
            "#,
        )
        .bind(learner_id)
        .bind(kind.as_str())
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_arm(&r)).transpose().map_err(StoreError::Sqlx)
    }

    pub async fn arms_for_items(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_ids: &[String],
    ) -> Result<Vec<Arm>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM "bandit_arms"
            WHERE "learnerId" = $1 AND "itemType" = $2 AND "itemId" = ANY($3)
            "#,
        )
        .bind(learner_id)
        .bind(kind.as_str())
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(map_arm)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlx)
    }

    pub async fn weakest(
        &self,
        learner_id: &str,
        kind: ItemKind,
        limit: usize,
    ) -> Result<Vec<Arm>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM "bandit_arms"
            WHERE "learnerId" = $1 AND "itemType" = $2
            ORDER BY "avgReward" ASC, "pulls" ASC, "itemId" ASC
            LIMIT $3
            "#,
        )
        .bind(learner_id)
        .bind(kind.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(map_arm)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlx)
    }

    pub async fn activate(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
        touch_last_shown: bool,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE "bandit_arms" SET "isActive" = FALSE
            WHERE "learnerId" = $1 AND "itemType" = $2 AND "isActive" AND "itemId" <> $3
            "#,
        )
        .bind(learner_id)
        .bind(kind.as_str())
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        if touch_last_shown {
            sqlx::query(
                r#"
                UPDATE "bandit_arms" SET "isActive" = TRUE, "lastShownAt" = $4
                WHERE "learnerId" = $1 AND "itemType" = $2 AND "itemId" = $3
                "#,
            )
            .bind(learner_id)
            .bind(kind.as_str())
            .bind(item_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                r#"
                UPDATE "bandit_arms" SET "isActive" = TRUE
                WHERE "learnerId" = $1 AND "itemType" = $2 AND "itemId" = $3
                "#,
            )
            .bind(learner_id)
            .bind(kind.as_str())
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn claim_active(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE "bandit_arms" SET "isActive" = FALSE
            WHERE "learnerId" = $1 AND "itemType" = $2 AND "itemId" = $3 AND "isActive"
            "#,
        )
        .bind(learner_id)
        .bind(kind.as_str())
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn apply_reward(
        &self,
        learner_id: &str,
        kind: ItemKind,
        item_id: &str,
        reward: f64,
    ) -> Result<Option<Arm>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE "bandit_arms"
            SET "pulls" = "pulls" + 1,
                "totalReward" = "totalReward" + $4,
                "avgReward" = ("totalReward" + $4) / ("pulls" + 1)
            WHERE "learnerId" = $1 AND "itemType" = $2 AND "itemId" = $3
            RETURNING *
            "#,
        )
        .bind(learner_id)
        .bind(kind.as_str())
        .bind(item_id)
        .bind(reward)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_arm(&r)).transpose().map_err(StoreError::Sqlx)
    }
}

fn map_arm(row: &PgRow) -> Result<Arm, sqlx::Error> {
    let kind_raw: String = row.try_get("itemType")?;
    let kind = ItemKind::parse(&kind_raw).ok_or_else(|| sqlx::Error::Decode(
        format!("unknown item type in bandit_arms: {kind_raw}").into(),
    ))?;

    Ok(Arm {
        learner_id: row.try_get("learnerId")?,
        kind,
        item_id: row.try_get("itemId")?,
        pulls: row.try_get("pulls")?,
        total_reward: row.try_get("totalReward")?,
        avg_reward: row.try_get("avgReward")?,
        is_active: row.try_get("isActive")?,
        last_shown_at: row.try_get("lastShownAt")?,
    })
}

async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    tracing::info!("running database migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS "_migrations" (
            "id" SERIAL PRIMARY KEY,
            "name" TEXT NOT NULL UNIQUE,
            "applied_at" TIMESTAMP NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    let applied: Vec<String> =
        sqlx::query_scalar(r#"SELECT "name" FROM "_migrations" ORDER BY "id""#)
            .fetch_all(pool)
            .await?;

    let migrations = [("001_bandit_arms", include_str!("../../sql/001_bandit_arms.sql"))];

    for (name, sql) in migrations {
        if applied.iter().any(|m| m == name) {
            continue;
        }

        tracing::info!(migration = name, "applying migration");
        for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(pool).await?;
        }
        sqlx::query(r#"INSERT INTO "_migrations" ("name") VALUES ($1)"#)
            .bind(name)
            .execute(pool)
            .await?;
    }

    Ok(())
}
