use glmock_client::{Client, ClientError};
use glmock_model::{
    IndexSet, IndexSetUpdateParams, Input, InputUpdateParams, Role, RoleUpdateParams, User,
    UserUpdateParams,
};
use mockserver::config::MockServerConfig;
use mockserver::{RunningServer, start};
use reqwest::StatusCode;
use std::time::Duration;

async fn server() -> RunningServer {
    let config = MockServerConfig {
        bind_addr: "127.0.0.1:0".parse().expect("bind"),
        ..MockServerConfig::default()
    };
    start(&config).await.expect("mock server")
}

fn admin(server: &RunningServer) -> Client {
    Client::builder(server.endpoint(), "admin", "admin")
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client")
}

#[tokio::test]
async fn role_lifecycle() {
    let server = server().await;
    let client = admin(&server);

    let (role, info) = client
        .create_role(&Role::new("Ops Team", vec!["inputs:read".to_string()]))
        .await
        .expect("create");
    assert_eq!(info.status, StatusCode::OK);
    assert!(!role.id.is_empty());

    let (fetched, _) = client.get_role("Ops Team").await.expect("get");
    assert_eq!(fetched, role);

    let mut params = RoleUpdateParams::from(&role);
    params.permissions.push("inputs:edit".to_string());
    let info = client.update_role("Ops Team", &params).await.expect("update");
    assert_eq!(info.status, StatusCode::NO_CONTENT);
    assert!(info.body.is_empty());

    let (roles, _) = client.list_roles().await.expect("list");
    assert_eq!(roles.total, 3);

    client
        .add_role_member("Ops Team", "admin")
        .await
        .expect("add member");
    let (members, _) = client.role_members("Ops Team").await.expect("members");
    assert_eq!(members.users.len(), 1);
    client
        .remove_role_member("Ops Team", "admin")
        .await
        .expect("remove member");

    let info = client.delete_role("Ops Team").await.expect("delete");
    assert_eq!(info.status, StatusCode::NO_CONTENT);
    let err = client.get_role("Ops Team").await.expect_err("gone");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.error_response().map(|e| e.code.as_str()), Some("not_found"));
}

#[tokio::test]
async fn user_lifecycle_hides_passwords() {
    let server = server().await;
    let client = admin(&server);

    let mut user = User::new("alice").with_roles(["Reader"]);
    user.password = Some("s3cret".to_string());
    user.email = "alice@example.com".to_string();
    let (created, _) = client.create_user(&user).await.expect("create");
    assert!(created.password.is_none());

    client
        .update_user(
            "alice",
            &UserUpdateParams {
                full_name: Some("Alice".to_string()),
                ..UserUpdateParams::default()
            },
        )
        .await
        .expect("update");
    let (fetched, _) = client.get_user("alice").await.expect("get");
    assert_eq!(fetched.full_name, "Alice");
    assert_eq!(fetched.email, "alice@example.com");

    let (users, _) = client.list_users().await.expect("list");
    assert_eq!(users.len(), 2);

    let alice = Client::new(server.endpoint(), "alice", "s3cret").expect("alice");
    let err = alice
        .create_role(&Role::new("Nope", vec!["*".to_string()]))
        .await
        .expect_err("reader can not create roles");
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    client.delete_user("alice").await.expect("delete");
    let err = client.delete_user("alice").await.expect_err("gone");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn inputs_and_index_sets() {
    let server = server().await;
    let client = admin(&server);

    let (default_set, _) = client
        .create_index_set(&IndexSet::new("Default index set", "graylog"))
        .await
        .expect("default set");
    assert!(default_set.is_default);
    let (audit, _) = client
        .create_index_set(&IndexSet::new("Audit", "audit"))
        .await
        .expect("audit set");

    let (input, _) = client
        .create_input(&Input {
            title: "syslog".to_string(),
            kind: "org.graylog2.inputs.syslog.udp.SyslogUDPInput".to_string(),
            global: true,
            index_set_id: Some(audit.id.clone()),
            ..Input::default()
        })
        .await
        .expect("input");
    assert_eq!(input.creator_user_id.as_deref(), Some("admin"));

    let (stats, _) = client.index_set_stats(&audit.id).await.expect("stats");
    assert_eq!(stats.indices, 1);
    let (total, _) = client.total_index_set_stats().await.expect("total");
    assert_eq!(total.indices, 1);
    let (listed, _) = client.list_index_sets(true).await.expect("list");
    assert_eq!(listed.total, 2);
    assert_eq!(
        listed
            .stats
            .as_ref()
            .and_then(|s| s.get(&default_set.id))
            .map(|s| s.indices),
        Some(0)
    );

    client
        .update_input(
            &input.id,
            &InputUpdateParams {
                title: "syslog renamed".to_string(),
                kind: input.kind.clone(),
                ..InputUpdateParams::default()
            },
        )
        .await
        .expect("update input");
    let (updated, _) = client.get_input(&input.id).await.expect("get input");
    assert_eq!(updated.title, "syslog renamed");
    assert!(updated.global);

    client
        .update_index_set(
            &audit.id,
            &IndexSetUpdateParams {
                replicas: Some(1),
                ..IndexSetUpdateParams::default()
            },
        )
        .await
        .expect("update set");
    let (new_default, _) = client
        .set_default_index_set(&audit.id)
        .await
        .expect("set default");
    assert!(new_default.is_default);

    client
        .delete_index_set(&default_set.id)
        .await
        .expect("old default is deletable");
    let err = client
        .delete_index_set(&audit.id)
        .await
        .expect_err("default");
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

    client.delete_input(&input.id).await.expect("delete input");
    let (inputs, _) = client.list_inputs().await.expect("list inputs");
    assert_eq!(inputs.total, 0);
}

#[tokio::test]
async fn empty_names_fail_locally() {
    let client = Client::new("http://127.0.0.1:9/api", "admin", "admin").expect("client");
    for err in [
        client.get_role("").await.expect_err("role"),
        client.get_user("").await.expect_err("user"),
        client.get_input("").await.expect_err("input"),
        client.index_set_stats("").await.expect_err("index set"),
    ] {
        assert!(matches!(err, ClientError::InvalidArgument(_)));
        assert!(err.call_info().is_none());
    }
    let err = client
        .delete_role("")
        .await
        .expect_err("delete role");
    assert!(matches!(err, ClientError::InvalidArgument(_)));
}

#[tokio::test]
async fn anonymous_and_unknown_users_are_unauthorized() {
    let server = server().await;
    let stranger = Client::new(server.endpoint(), "stranger", "x").expect("client");
    let err = stranger.list_roles().await.expect_err("unknown user");
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    let info = err.call_info().expect("info");
    assert!(info.body.contains("unauthorized"));
}

#[tokio::test]
async fn per_call_deadline_wraps_a_call() {
    let server = server().await;
    let client = admin(&server);
    let (body, info) = tokio::time::timeout(Duration::from_secs(5), client.total_index_set_stats())
        .await
        .expect("within deadline")
        .expect("stats");
    assert_eq!(info.status, StatusCode::OK);
    assert_eq!(body.indices, 0);
}
