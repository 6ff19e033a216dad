use crate::access::{with_store_timeout, AccessStore};
use crate::models::users::RequestUser;

/// Single capability check behind the admin/teacher bypass. Performs every
/// required layer internally and returns one boolean; callers never inspect
/// intermediate layers.
///
/// Layers: the configured email allowlist, the authoritative role column,
/// and the independent role-grants lookup. All three must agree. Any layer
/// erroring, timing out, or disagreeing resolves to denied.
#[tracing::instrument(name = "Verify privilege", skip(store, allowlist))]
pub async fn verify_privilege(
    user: &RequestUser,
    store: &dyn AccessStore,
    allowlist: &[String],
) -> bool {
    let allowlisted = allowlist
        .iter()
        .any(|email| email.eq_ignore_ascii_case(&user.email));

    let role_verdict = match with_store_timeout(store.authoritative_role(user.id)).await {
        Ok(role) => role.map_or(false, |r| r.is_privileged()),
        Err(e) => {
            tracing::error!(
                error = %e,
                user_id = user.id,
                "role lookup failed during privilege verification; denying"
            );
            return false;
        }
    };

    let grant_verdict = match with_store_timeout(store.role_grant(user.id)).await {
        Ok(role) => role.map_or(false, |r| r.is_privileged()),
        Err(e) => {
            tracing::error!(
                error = %e,
                user_id = user.id,
                "role grant lookup failed during privilege verification; denying"
            );
            return false;
        }
    };

    if allowlisted && role_verdict && grant_verdict {
        return true;
    }

    if allowlisted || role_verdict || grant_verdict {
        // Security-relevant: the layers disagree, e.g. the allowlist says
        // yes but the role table says nothing.
        tracing::warn!(
            user_id = user.id,
            allowlisted,
            role_verdict,
            grant_verdict,
            "privilege verification layers disagree; denying"
        );
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::test_store::MemoryStore;
    use crate::models::users::Role;

    fn admin_user() -> RequestUser {
        RequestUser {
            id: 1,
            email: "admin@coursebase.test".to_string(),
        }
    }

    fn allowlist() -> Vec<String> {
        vec!["admin@coursebase.test".to_string()]
    }

    #[tokio::test]
    async fn all_layers_agreeing_grants_privilege() {
        let store = MemoryStore::new()
            .with_role(1, Role::Admin)
            .with_grant(1, Role::Admin);

        assert!(verify_privilege(&admin_user(), &store, &allowlist()).await);
    }

    #[tokio::test]
    async fn teacher_role_is_privileged_too() {
        let store = MemoryStore::new()
            .with_role(1, Role::Teacher)
            .with_grant(1, Role::Teacher);

        assert!(verify_privilege(&admin_user(), &store, &allowlist()).await);
    }

    #[tokio::test]
    async fn allowlist_alone_is_denied() {
        // Allowlist says yes, role table says nothing: mismatch, deny.
        let store = MemoryStore::new();

        assert!(!verify_privilege(&admin_user(), &store, &allowlist()).await);
    }

    #[tokio::test]
    async fn role_table_without_allowlist_is_denied() {
        let store = MemoryStore::new()
            .with_role(1, Role::Admin)
            .with_grant(1, Role::Admin);

        assert!(!verify_privilege(&admin_user(), &store, &[]).await);
    }

    #[tokio::test]
    async fn missing_grant_layer_is_denied() {
        let store = MemoryStore::new().with_role(1, Role::Admin);

        assert!(!verify_privilege(&admin_user(), &store, &allowlist()).await);
    }

    #[tokio::test]
    async fn student_role_is_not_privileged() {
        let store = MemoryStore::new()
            .with_role(1, Role::Student)
            .with_grant(1, Role::Student);

        assert!(!verify_privilege(&admin_user(), &store, &allowlist()).await);
    }

    #[tokio::test]
    async fn store_failure_denies() {
        let store = MemoryStore {
            fail_lookups: true,
            ..MemoryStore::new()
        };

        assert!(!verify_privilege(&admin_user(), &store, &allowlist()).await);
    }

    #[tokio::test]
    async fn allowlist_comparison_ignores_case() {
        let store = MemoryStore::new()
            .with_role(1, Role::Admin)
            .with_grant(1, Role::Admin);
        let user = RequestUser {
            id: 1,
            email: "Admin@Coursebase.Test".to_string(),
        };

        assert!(verify_privilege(&user, &store, &allowlist()).await);
    }
}
