//! Cross-collection cleanup run after a mutation.
//!
//! Each rule scans the dependent collection and fixes rows one store update
//! at a time. Rows removed concurrently are skipped. Nothing here is atomic
//! across collections unless the engine holds its serialized guard.
use crate::store::{MockStore, StoreError, StoreResult};

/// Drop `role_name` from every user that holds it. Returns the number of
/// users changed.
pub(crate) async fn dissociate_role(store: &MockStore, role_name: &str) -> StoreResult<usize> {
    let mut changed = 0;
    for user in store.users.list().await {
        if !user.has_role(role_name) {
            continue;
        }
        match store
            .users
            .update_with(&user.id, |user| {
                user.roles.remove(role_name);
            })
            .await
        {
            Ok(_) => changed += 1,
            Err(StoreError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(role = role_name, users = changed, "role dissociated from users");
    Ok(changed)
}

/// Rewrite user references after a role rename.
pub(crate) async fn rename_role_references(
    store: &MockStore,
    old_name: &str,
    new_name: &str,
) -> StoreResult<usize> {
    let mut changed = 0;
    for user in store.users.list().await {
        if !user.has_role(old_name) {
            continue;
        }
        match store
            .users
            .update_with(&user.id, |user| {
                if user.roles.remove(old_name) {
                    user.roles.insert(new_name.to_string());
                }
            })
            .await
        {
            Ok(_) => changed += 1,
            Err(StoreError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(from = old_name, to = new_name, users = changed, "role references renamed");
    Ok(changed)
}

/// Clear `index_set_id` on inputs that point at a deleted index set.
pub(crate) async fn clear_index_set_references(
    store: &MockStore,
    index_set_id: &str,
) -> StoreResult<usize> {
    let mut changed = 0;
    for input in store.inputs.list().await {
        if input.index_set_id.as_deref() != Some(index_set_id) {
            continue;
        }
        match store
            .inputs
            .update_with(&input.id, |input| input.index_set_id = None)
            .await
        {
            Ok(_) => changed += 1,
            Err(StoreError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(index_set_id, inputs = changed, "index set references cleared");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glmock_model::{Input, User};

    #[tokio::test]
    async fn dissociate_role_touches_only_holders() {
        let store = MockStore::new();
        store
            .users
            .add(User::new("alice").with_roles(["Ops", "Reader"]))
            .await
            .expect("alice");
        store
            .users
            .add(User::new("bob").with_roles(["Reader"]))
            .await
            .expect("bob");

        assert_eq!(dissociate_role(&store, "Ops").await.expect("cleanup"), 1);
        let alice = store.users.get_by_key("alice").await.expect("alice");
        assert!(!alice.has_role("Ops"));
        assert!(alice.has_role("Reader"));
        assert_eq!(dissociate_role(&store, "Ops").await.expect("again"), 0);
    }

    #[tokio::test]
    async fn rename_rewrites_references() {
        let store = MockStore::new();
        store
            .users
            .add(User::new("alice").with_roles(["Ops"]))
            .await
            .expect("alice");
        assert_eq!(
            rename_role_references(&store, "Ops", "Operators")
                .await
                .expect("rename"),
            1
        );
        let alice = store.users.get_by_key("alice").await.expect("alice");
        assert!(alice.has_role("Operators"));
        assert!(!alice.has_role("Ops"));
    }

    #[tokio::test]
    async fn clear_index_set_references_unsets_inputs() {
        let store = MockStore::new();
        let input = store
            .inputs
            .add(Input {
                title: "beats".to_string(),
                kind: "beats".to_string(),
                index_set_id: Some("set-1".to_string()),
                ..Input::default()
            })
            .await
            .expect("input");
        assert_eq!(
            clear_index_set_references(&store, "set-1").await.expect("clear"),
            1
        );
        assert_eq!(store.inputs.get(&input.id).await.expect("input").index_set_id, None);
    }
}
