use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{LaunchId, Result, User, UserId, UserStore};

/// PostgreSQL-backed user store implementation.
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Creates a new PostgreSQL user store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_user(row: &PgRow, trips: Vec<LaunchId>) -> Result<User> {
        Ok(User {
            id: UserId::new(row.try_get("id")?),
            username: row.try_get("email")?,
            trips,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(skip(self, email))]
    async fn find_or_create(&self, email: &str) -> Result<Vec<User>> {
        // The unique constraint on email makes concurrent first logins
        // collapse onto one row.
        sqlx::query("INSERT INTO users (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
            .bind(email)
            .execute(&self.pool)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT id, email, created_at
            FROM users
            WHERE email = $1
            ORDER BY id ASC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let id = UserId::new(row.try_get("id")?);
            let trips = self.trips_for_user(id).await?;
            users.push(Self::row_to_user(&row, trips)?);
        }
        Ok(users)
    }

    #[tracing::instrument(skip(self))]
    async fn add_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO trips (user_id, launch_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT unique_user_launch DO NOTHING
            "#,
        )
        .bind(user_id.as_i64())
        .bind(launch_id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_trip(&self, user_id: UserId, launch_id: LaunchId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trips WHERE user_id = $1 AND launch_id = $2")
            .bind(user_id.as_i64())
            .bind(launch_id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn trips_for_user(&self, user_id: UserId) -> Result<Vec<LaunchId>> {
        let launch_ids: Vec<i64> =
            sqlx::query_scalar("SELECT launch_id FROM trips WHERE user_id = $1 ORDER BY id ASC")
                .bind(user_id.as_i64())
                .fetch_all(&self.pool)
                .await?;

        Ok(launch_ids.into_iter().map(LaunchId::new).collect())
    }
}
