use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::models::family::{
    FamilyGroup, FamilyMember, FamilyRole, FamilyStatus, NewFamilyGroup, NewFamilyMember,
};

pub const INVITE_CODE_LEN: usize = 6;
const INVITE_CODE_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Write workflows (create, join) retry the whole sequence up to this many
/// attempts with a fixed delay between them. Reads are never retried.
const WRITE_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("storage error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum FamilyError {
    #[error("Please enter a family name")]
    EmptyName,
    #[error("Please enter an invite code")]
    EmptyInviteCode,
    #[error("You already belong to a family group")]
    AlreadyMember,
    #[error("No family found to join")]
    NoFamilyFound,
    #[error("You do not belong to a family group yet")]
    NotAMember,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FamilyError {
    /// Only backend failures are worth retrying; validation and state errors
    /// will fail the same way on every attempt.
    fn is_transient(&self) -> bool {
        matches!(self, FamilyError::Store(_))
    }
}

/// Row-level operations the family workflow needs from the data store.
/// Implemented by [`crate::db::family_store::PgFamilyStore`]; tests use an
/// in-memory stand-in.
#[async_trait]
pub trait FamilyStore: Send + Sync {
    async fn membership_for_user(&self, user_id: Uuid) -> Result<Option<FamilyMember>, StoreError>;
    async fn group_by_id(&self, id: Uuid) -> Result<Option<FamilyGroup>, StoreError>;
    async fn group_count(&self) -> Result<i64, StoreError>;
    async fn group_by_invite_code(&self, code: &str) -> Result<Option<FamilyGroup>, StoreError>;
    async fn insert_group(&self, group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError>;
    async fn insert_member(&self, member: &NewFamilyMember) -> Result<FamilyMember, StoreError>;
    async fn delete_group(&self, id: Uuid) -> Result<(), StoreError>;
}

/// 6-character uppercase base-36 token. No collision check: the code gates
/// joining, it is not a globally unique key.
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_CODE_CHARS[rng.gen_range(0..INVITE_CODE_CHARS.len())] as char)
        .collect()
}

pub struct FamilyService;

impl FamilyService {
    /// Resolve the caller's membership state: either their current family, or
    /// whether any family exists at all (create form vs. join form).
    pub async fn status<S: FamilyStore>(
        store: &S,
        user_id: Uuid,
    ) -> Result<FamilyStatus, FamilyError> {
        match store.membership_for_user(user_id).await? {
            Some(membership) => {
                let family = store.group_by_id(membership.family_id).await?;
                Ok(FamilyStatus {
                    is_family_member: true,
                    is_first_user: false,
                    family,
                    membership: Some(membership),
                })
            }
            None => {
                let count = store.group_count().await?;
                Ok(FamilyStatus {
                    is_family_member: false,
                    is_first_user: count == 0,
                    family: None,
                    membership: None,
                })
            }
        }
    }

    /// Membership lookup for handlers that require an established family.
    pub async fn require_membership<S: FamilyStore>(
        store: &S,
        user_id: Uuid,
    ) -> Result<FamilyMember, FamilyError> {
        store
            .membership_for_user(user_id)
            .await?
            .ok_or(FamilyError::NotAMember)
    }

    /// Create a family group and its owner membership.
    ///
    /// Two-step saga against the row-CRUD store: insert the group, then the
    /// owner membership. If the membership insert fails the group is deleted
    /// again so no ownerless group is left visible; if that compensating
    /// delete also fails we only log it. The whole sequence is retried on
    /// transient store failures.
    pub async fn create<S: FamilyStore>(
        store: &S,
        user_id: Uuid,
        name: &str,
    ) -> Result<FamilyGroup, FamilyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FamilyError::EmptyName);
        }
        if store.membership_for_user(user_id).await?.is_some() {
            return Err(FamilyError::AlreadyMember);
        }

        let mut attempt = 1;
        loop {
            match Self::create_once(store, user_id, name).await {
                Ok(group) => return Ok(group),
                Err(e) if attempt < WRITE_ATTEMPTS && e.is_transient() => {
                    warn!(attempt, error = %e, "family creation failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn create_once<S: FamilyStore>(
        store: &S,
        user_id: Uuid,
        name: &str,
    ) -> Result<FamilyGroup, FamilyError> {
        let group = store
            .insert_group(&NewFamilyGroup {
                name: name.to_string(),
                owner_id: user_id,
                invite_code: generate_invite_code(),
            })
            .await?;

        let member = NewFamilyMember {
            family_id: group.id,
            user_id,
            role: FamilyRole::Owner,
        };
        if let Err(e) = store.insert_member(&member).await {
            if let Err(del) = store.delete_group(group.id).await {
                error!(
                    family_id = %group.id,
                    error = %del,
                    "compensating delete failed; ownerless group left behind"
                );
            }
            return Err(e.into());
        }
        Ok(group)
    }

    /// Join the family group carrying the given invite code as a member.
    ///
    /// Joining is code-gated: with no matching group the join fails — it
    /// never falls back to creating a group or picking an arbitrary one.
    pub async fn join<S: FamilyStore>(
        store: &S,
        user_id: Uuid,
        invite_code: &str,
    ) -> Result<FamilyGroup, FamilyError> {
        let code = invite_code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(FamilyError::EmptyInviteCode);
        }
        if store.membership_for_user(user_id).await?.is_some() {
            return Err(FamilyError::AlreadyMember);
        }

        let mut attempt = 1;
        loop {
            match Self::join_once(store, user_id, &code).await {
                Ok(group) => return Ok(group),
                Err(e) if attempt < WRITE_ATTEMPTS && e.is_transient() => {
                    warn!(attempt, error = %e, "family join failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn join_once<S: FamilyStore>(
        store: &S,
        user_id: Uuid,
        code: &str,
    ) -> Result<FamilyGroup, FamilyError> {
        let group = store
            .group_by_invite_code(code)
            .await?
            .ok_or(FamilyError::NoFamilyFound)?;

        store
            .insert_member(&NewFamilyMember {
                family_id: group.id,
                user_id,
                role: FamilyRole::Member,
            })
            .await?;
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemState {
        groups: Vec<FamilyGroup>,
        members: Vec<FamilyMember>,
        // Remaining failures to inject, consumed one per call.
        fail_group_inserts: u32,
        fail_member_inserts: u32,
        fail_group_deletes: u32,
        group_insert_calls: u32,
        invite_lookups: u32,
    }

    #[derive(Default)]
    struct MemStore {
        state: Mutex<MemState>,
    }

    impl MemStore {
        fn with_group(name: &str, owner_id: Uuid, invite_code: &str) -> (Self, Uuid) {
            let store = Self::default();
            let id = Uuid::new_v4();
            store.state.lock().unwrap().groups.push(FamilyGroup {
                id,
                name: name.to_string(),
                owner_id,
                invite_code: invite_code.to_string(),
                created_at: Utc::now(),
            });
            (store, id)
        }

        fn add_member(&self, family_id: Uuid, user_id: Uuid, role: FamilyRole) {
            self.state.lock().unwrap().members.push(FamilyMember {
                id: Uuid::new_v4(),
                family_id,
                user_id,
                role: role.to_string(),
                joined_at: Utc::now(),
            });
        }
    }

    fn take_failure(remaining: &mut u32) -> Result<(), StoreError> {
        if *remaining > 0 {
            *remaining -= 1;
            Err(StoreError::Backend("injected failure".into()))
        } else {
            Ok(())
        }
    }

    #[async_trait]
    impl FamilyStore for MemStore {
        async fn membership_for_user(
            &self,
            user_id: Uuid,
        ) -> Result<Option<FamilyMember>, StoreError> {
            let state = self.state.lock().unwrap();
            Ok(state.members.iter().find(|m| m.user_id == user_id).cloned())
        }

        async fn group_by_id(&self, id: Uuid) -> Result<Option<FamilyGroup>, StoreError> {
            let state = self.state.lock().unwrap();
            Ok(state.groups.iter().find(|g| g.id == id).cloned())
        }

        async fn group_count(&self) -> Result<i64, StoreError> {
            Ok(self.state.lock().unwrap().groups.len() as i64)
        }

        async fn group_by_invite_code(
            &self,
            code: &str,
        ) -> Result<Option<FamilyGroup>, StoreError> {
            let mut state = self.state.lock().unwrap();
            state.invite_lookups += 1;
            Ok(state.groups.iter().find(|g| g.invite_code == code).cloned())
        }

        async fn insert_group(&self, group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError> {
            let mut state = self.state.lock().unwrap();
            state.group_insert_calls += 1;
            take_failure(&mut state.fail_group_inserts)?;
            let row = FamilyGroup {
                id: Uuid::new_v4(),
                name: group.name.clone(),
                owner_id: group.owner_id,
                invite_code: group.invite_code.clone(),
                created_at: Utc::now(),
            };
            state.groups.push(row.clone());
            Ok(row)
        }

        async fn insert_member(&self, member: &NewFamilyMember) -> Result<FamilyMember, StoreError> {
            let mut state = self.state.lock().unwrap();
            take_failure(&mut state.fail_member_inserts)?;
            let row = FamilyMember {
                id: Uuid::new_v4(),
                family_id: member.family_id,
                user_id: member.user_id,
                role: member.role.to_string(),
                joined_at: Utc::now(),
            };
            state.members.push(row.clone());
            Ok(row)
        }

        async fn delete_group(&self, id: Uuid) -> Result<(), StoreError> {
            let mut state = self.state.lock().unwrap();
            take_failure(&mut state.fail_group_deletes)?;
            state.groups.retain(|g| g.id != id);
            Ok(())
        }
    }

    fn is_upper_alnum(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    #[test]
    fn invite_code_is_six_uppercase_alphanumeric_chars() {
        for _ in 0..100 {
            let code = generate_invite_code();
            assert_eq!(code.len(), INVITE_CODE_LEN);
            assert!(is_upper_alnum(&code), "bad code: {code}");
        }
    }

    #[tokio::test]
    async fn status_reports_existing_membership() {
        let user = Uuid::new_v4();
        let (store, family_id) = MemStore::with_group("Smiths", user, "ABC123");
        store.add_member(family_id, user, FamilyRole::Owner);

        let status = FamilyService::status(&store, user).await.unwrap();
        assert!(status.is_family_member);
        assert_eq!(status.family.unwrap().id, family_id);
        assert_eq!(status.membership.unwrap().role, "owner");
    }

    #[tokio::test]
    async fn status_selects_create_form_for_first_user() {
        let store = MemStore::default();
        let status = FamilyService::status(&store, Uuid::new_v4()).await.unwrap();
        assert!(!status.is_family_member);
        assert!(status.is_first_user);
    }

    #[tokio::test]
    async fn status_selects_join_form_when_a_group_exists() {
        let (store, _) = MemStore::with_group("Smiths", Uuid::new_v4(), "ABC123");
        let status = FamilyService::status(&store, Uuid::new_v4()).await.unwrap();
        assert!(!status.is_family_member);
        assert!(!status.is_first_user);
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_touching_the_store() {
        let store = MemStore::default();
        let err = FamilyService::create(&store, Uuid::new_v4(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, FamilyError::EmptyName));

        let state = store.state.lock().unwrap();
        assert_eq!(state.group_insert_calls, 0);
        assert!(state.groups.is_empty());
    }

    #[tokio::test]
    async fn create_inserts_group_and_owner_membership() {
        let store = MemStore::default();
        let user = Uuid::new_v4();

        let group = FamilyService::create(&store, user, "The Smiths").await.unwrap();
        assert_eq!(group.name, "The Smiths");
        assert_eq!(group.owner_id, user);
        assert_eq!(group.invite_code.len(), INVITE_CODE_LEN);
        assert!(is_upper_alnum(&group.invite_code));

        let state = store.state.lock().unwrap();
        assert_eq!(state.groups.len(), 1);
        assert_eq!(state.members.len(), 1);
        let member = &state.members[0];
        assert_eq!(member.family_id, group.id);
        assert_eq!(member.user_id, user);
        assert_eq!(member.role, "owner");
    }

    #[tokio::test]
    async fn create_rejects_user_who_already_has_a_family() {
        let user = Uuid::new_v4();
        let (store, family_id) = MemStore::with_group("Smiths", user, "ABC123");
        store.add_member(family_id, user, FamilyRole::Owner);

        let err = FamilyService::create(&store, user, "Another").await.unwrap_err();
        assert!(matches!(err, FamilyError::AlreadyMember));
    }

    #[tokio::test(start_paused = true)]
    async fn create_deletes_group_when_member_insert_fails() {
        let store = MemStore::default();
        // Every membership insert fails, so every attempt must compensate.
        store.state.lock().unwrap().fail_member_inserts = u32::MAX;

        let err = FamilyService::create(&store, Uuid::new_v4(), "Smiths")
            .await
            .unwrap_err();
        assert!(matches!(err, FamilyError::Store(_)));

        let state = store.state.lock().unwrap();
        assert!(state.groups.is_empty(), "orphaned group left behind");
        assert!(state.members.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn create_retries_transient_failures_then_succeeds() {
        let store = MemStore::default();
        store.state.lock().unwrap().fail_group_inserts = 1;

        let user = Uuid::new_v4();
        let group = FamilyService::create(&store, user, "Smiths").await.unwrap();
        assert_eq!(group.owner_id, user);

        let state = store.state.lock().unwrap();
        assert_eq!(state.group_insert_calls, 2);
        assert_eq!(state.groups.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn create_gives_up_after_bounded_attempts() {
        let store = MemStore::default();
        store.state.lock().unwrap().fail_group_inserts = u32::MAX;

        let err = FamilyService::create(&store, Uuid::new_v4(), "Smiths")
            .await
            .unwrap_err();
        assert!(matches!(err, FamilyError::Store(_)));
        assert_eq!(store.state.lock().unwrap().group_insert_calls, 3);
    }

    #[tokio::test]
    async fn join_with_valid_code_creates_member_row() {
        let owner = Uuid::new_v4();
        let (store, family_id) = MemStore::with_group("Smiths", owner, "XYZ789");
        store.add_member(family_id, owner, FamilyRole::Owner);

        let joiner = Uuid::new_v4();
        let group = FamilyService::join(&store, joiner, "XYZ789").await.unwrap();
        assert_eq!(group.id, family_id);

        let state = store.state.lock().unwrap();
        let member = state.members.iter().find(|m| m.user_id == joiner).unwrap();
        assert_eq!(member.family_id, family_id);
        assert_eq!(member.role, "member");
    }

    #[tokio::test]
    async fn join_normalizes_invite_code_case() {
        let (store, family_id) = MemStore::with_group("Smiths", Uuid::new_v4(), "XYZ789");
        let group = FamilyService::join(&store, Uuid::new_v4(), "  xyz789 ").await.unwrap();
        assert_eq!(group.id, family_id);
    }

    #[tokio::test]
    async fn join_with_unknown_code_fails_without_inserting() {
        let (store, _) = MemStore::with_group("Smiths", Uuid::new_v4(), "XYZ789");
        let err = FamilyService::join(&store, Uuid::new_v4(), "NOPE00")
            .await
            .unwrap_err();
        assert!(matches!(err, FamilyError::NoFamilyFound));

        let state = store.state.lock().unwrap();
        assert!(state.members.is_empty());
        // Not a transient failure: no retry happened.
        assert_eq!(state.invite_lookups, 1);
    }

    #[tokio::test]
    async fn join_against_empty_store_fails_outright() {
        let store = MemStore::default();
        let err = FamilyService::join(&store, Uuid::new_v4(), "ABC123")
            .await
            .unwrap_err();
        assert!(matches!(err, FamilyError::NoFamilyFound));
        assert!(store.state.lock().unwrap().groups.is_empty());
    }

    #[tokio::test]
    async fn join_rejects_user_who_already_has_a_family() {
        let user = Uuid::new_v4();
        let (store, family_id) = MemStore::with_group("Smiths", user, "ABC123");
        store.add_member(family_id, user, FamilyRole::Member);

        let err = FamilyService::join(&store, user, "ABC123").await.unwrap_err();
        assert!(matches!(err, FamilyError::AlreadyMember));
    }

    #[tokio::test]
    async fn join_rejects_blank_invite_code() {
        let store = MemStore::default();
        let err = FamilyService::join(&store, Uuid::new_v4(), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, FamilyError::EmptyInviteCode));
        assert_eq!(store.state.lock().unwrap().invite_lookups, 0);
    }
}
