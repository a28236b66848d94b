use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::family::{FamilyGroup, FamilyMember, NewFamilyGroup, NewFamilyMember};
use crate::services::family::{FamilyStore, StoreError};

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Postgres-backed implementation of the family workflow's store seam.
#[derive(Clone)]
pub struct PgFamilyStore {
    pool: PgPool,
}

impl PgFamilyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FamilyStore for PgFamilyStore {
    async fn membership_for_user(&self, user_id: Uuid) -> Result<Option<FamilyMember>, StoreError> {
        let member = sqlx::query_as::<_, FamilyMember>(
            "SELECT id, family_id, user_id, role, joined_at
             FROM family_members WHERE user_id = $1 LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    async fn group_by_id(&self, id: Uuid) -> Result<Option<FamilyGroup>, StoreError> {
        let group = sqlx::query_as::<_, FamilyGroup>(
            "SELECT id, name, owner_id, invite_code, created_at
             FROM family_groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(group)
    }

    async fn group_count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM family_groups")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn group_by_invite_code(&self, code: &str) -> Result<Option<FamilyGroup>, StoreError> {
        // Codes carry no uniqueness constraint; with duplicates any match is
        // acceptable.
        let group = sqlx::query_as::<_, FamilyGroup>(
            "SELECT id, name, owner_id, invite_code, created_at
             FROM family_groups WHERE invite_code = $1 LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(group)
    }

    async fn insert_group(&self, group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError> {
        let row = sqlx::query_as::<_, FamilyGroup>(
            "INSERT INTO family_groups (name, owner_id, invite_code)
             VALUES ($1, $2, $3)
             RETURNING id, name, owner_id, invite_code, created_at",
        )
        .bind(&group.name)
        .bind(group.owner_id)
        .bind(&group.invite_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_member(&self, member: &NewFamilyMember) -> Result<FamilyMember, StoreError> {
        let row = sqlx::query_as::<_, FamilyMember>(
            "INSERT INTO family_members (family_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING id, family_id, user_id, role, joined_at",
        )
        .bind(member.family_id)
        .bind(member.user_id)
        .bind(member.role.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_group(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM family_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
