//! Black-box tests for the HTTP client against an in-process fake backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};

use warden_client::{
    AdminApi, ApiClient, AuthSession, ClientError, InMemoryCredentialStore, ReportFormat,
    ReportRequest,
};
use warden_core::{ListFilter, PageRequest, Paginated, RoleId, UserId};
use warden_rbac::User;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn client_for(base_url: &str, credential: Option<&str>) -> ApiClient {
    let store = match credential {
        Some(c) => InMemoryCredentialStore::with_credential(c),
        None => InMemoryCredentialStore::new(),
    };
    ApiClient::new(base_url, Arc::new(AuthSession::new(Arc::new(store))))
}

fn sample_user(name: &str, email: &str, active: bool) -> User {
    User {
        id: UserId::new(),
        name: name.to_string(),
        email: email.to_string(),
        active,
        roles: vec![RoleId::new()],
    }
}

#[derive(Clone)]
struct UsersState {
    users: Arc<Vec<User>>,
    seen_auth: Arc<Mutex<Vec<Option<String>>>>,
}

async fn list_users_handler(
    State(state): State<UsersState>,
    headers: axum::http::HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Paginated<User>> {
    state.seen_auth.lock().unwrap().push(
        headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );

    let name = query.get("name").cloned().unwrap_or_default();
    let active = query.get("active").map(|v| v == "true");
    let page: usize = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let page_size: usize = query
        .get("page_size")
        .and_then(|v| v.parse().ok())
        .unwrap_or(25);

    let matches: Vec<User> = state
        .users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&name.to_lowercase()))
        .filter(|u| active.is_none_or(|a| u.active == a))
        .cloned()
        .collect();

    let total = matches.len() as u64;
    let items = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Json(Paginated {
        items,
        total,
        page: page as u32,
        page_size: page_size as u32,
    })
}

#[tokio::test]
async fn list_users_threads_pagination_and_filters() {
    let users = vec![
        sample_user("Ana", "ana@example.com", true),
        sample_user("Anabel", "anabel@example.com", false),
        sample_user("Bo", "bo@example.com", true),
    ];
    let state = UsersState {
        users: Arc::new(users),
        seen_auth: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/users", get(list_users_handler))
        .with_state(state.clone());
    let srv = TestServer::spawn(app).await;

    let api = client_for(&srv.base_url, Some("opaque-token"));
    let filter = ListFilter::default().with_name("ana").with_active(true);
    let page = api
        .list_users(PageRequest::new(1, 10), &filter)
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Ana");

    // bearer credential travelled with the request
    let seen = state.seen_auth.lock().unwrap();
    assert_eq!(seen[0].as_deref(), Some("Bearer opaque-token"));
}

#[tokio::test]
async fn pagination_skips_prior_pages() {
    let users: Vec<User> = (0..5)
        .map(|i| sample_user(&format!("user{i}"), &format!("u{i}@example.com"), true))
        .collect();
    let expected_third = users[4].id;
    let state = UsersState {
        users: Arc::new(users),
        seen_auth: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/users", get(list_users_handler))
        .with_state(state);
    let srv = TestServer::spawn(app).await;

    let api = client_for(&srv.base_url, None);
    let page = api
        .list_users(PageRequest::new(3, 2), &ListFilter::default())
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, expected_third);
    assert_eq!(page.total_pages(), 3);
    assert!(!page.has_next());
}

#[tokio::test]
async fn unauthorized_clears_the_stored_credential() {
    let app = Router::new().route(
        "/users",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );
    let srv = TestServer::spawn(app).await;

    let auth = Arc::new(AuthSession::new(Arc::new(
        InMemoryCredentialStore::with_credential("stale-token"),
    )));
    let api = ApiClient::new(&srv.base_url, auth.clone());

    let err = api
        .list_users(PageRequest::default(), &ListFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired));
    assert!(auth.credential().is_none(), "401 must clear the credential");
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let app = Router::new().route(
        "/users",
        get(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "broken filter") }),
    );
    let srv = TestServer::spawn(app).await;

    let api = client_for(&srv.base_url, None);
    let err = api
        .list_users(PageRequest::default(), &ListFilter::default())
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body, "broken filter");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn crud_round_trips_through_typed_dtos() {
    use axum::extract::Path;
    use warden_client::{NewRole, NewUser, UpdateModule, UpdateUser};
    use warden_core::ModuleId;
    use warden_rbac::{Module, Role};

    let app = Router::new()
        .route(
            "/users",
            post(|Json(input): Json<NewUser>| async move {
                Json(User {
                    id: UserId::new(),
                    name: input.name,
                    email: input.email,
                    active: input.active,
                    roles: input.roles,
                })
            }),
        )
        .route(
            "/users/:id",
            axum::routing::put(
                |Path(id): Path<uuid::Uuid>, Json(input): Json<UpdateUser>| async move {
                    Json(User {
                        id: UserId::from_uuid(id),
                        name: input.name.unwrap_or_default(),
                        email: input.email.unwrap_or_default(),
                        active: input.active.unwrap_or(true),
                        roles: input.roles.unwrap_or_default(),
                    })
                },
            ),
        )
        .route(
            "/roles",
            post(|Json(input): Json<NewRole>| async move {
                Json(Role {
                    id: RoleId::new(),
                    name: input.name,
                    description: input.description,
                    active: input.active,
                    permissions: vec![],
                })
            }),
        )
        .route(
            "/modules/:id",
            axum::routing::put(
                |Path(id): Path<uuid::Uuid>, Json(input): Json<UpdateModule>| async move {
                    Json(Module {
                        id: ModuleId::from_uuid(id),
                        name: input.name.unwrap_or_default(),
                        description: input.description.unwrap_or_default(),
                        active: input.active.unwrap_or(true),
                    })
                },
            ),
        );
    let srv = TestServer::spawn(app).await;
    let api = client_for(&srv.base_url, None);

    let role_id = RoleId::new();
    let created = api
        .create_user(&NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            active: true,
            roles: vec![role_id],
        })
        .await
        .unwrap();
    assert_eq!(created.name, "Ana");
    assert_eq!(created.roles, vec![role_id]);

    let updated = api
        .update_user(
            created.id,
            &UpdateUser {
                name: Some("Ana María".to_string()),
                active: Some(false),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Ana María");
    assert!(!updated.active);

    let role = api
        .create_role(&NewRole {
            name: "auditor".to_string(),
            description: "read-only access".to_string(),
            active: true,
        })
        .await
        .unwrap();
    assert_eq!(role.name, "auditor");

    let module = api
        .update_module(
            ModuleId::new(),
            &UpdateModule {
                active: Some(false),
                ..UpdateModule::default()
            },
        )
        .await
        .unwrap();
    assert!(!module.active);
}

#[tokio::test]
async fn audit_filters_travel_as_query_params() {
    use chrono::Utc;
    use warden_rbac::AuditEvent;

    let seen_query: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::new(Mutex::new(None));
    let seen_clone = seen_query.clone();

    let app = Router::new().route(
        "/audit",
        get(move |Query(query): Query<HashMap<String, String>>| {
            let seen = seen_clone.clone();
            async move {
                *seen.lock().unwrap() = Some(query);
                Json(Paginated {
                    items: vec![AuditEvent {
                        id: uuid::Uuid::new_v4(),
                        event: "role.permission_granted".to_string(),
                        actor: "Ana".to_string(),
                        module: "security".to_string(),
                        detail: "granted users.read".to_string(),
                        occurred_at: Utc::now(),
                    }],
                    total: 1,
                    page: 1,
                    page_size: 25,
                })
            }
        }),
    );
    let srv = TestServer::spawn(app).await;
    let api = client_for(&srv.base_url, None);

    let filter = ListFilter::default()
        .with_event("role.permission_granted")
        .with_module("security");
    let page = api.list_audit(PageRequest::default(), &filter).await.unwrap();

    assert_eq!(page.items[0].actor, "Ana");

    let seen = seen_query.lock().unwrap().clone().unwrap();
    assert_eq!(seen.get("event").map(String::as_str), Some("role.permission_granted"));
    assert_eq!(seen.get("module").map(String::as_str), Some("security"));
    assert_eq!(seen.get("page").map(String::as_str), Some("1"));
    assert_eq!(seen.get("page_size").map(String::as_str), Some("25"));
}

#[tokio::test]
async fn report_blob_is_returned_verbatim() {
    let received: Arc<Mutex<Option<ReportRequest>>> = Arc::new(Mutex::new(None));
    let received_clone = received.clone();

    let app = Router::new().route(
        "/reports",
        post(move |Json(req): Json<ReportRequest>| {
            let received = received_clone.clone();
            async move {
                *received.lock().unwrap() = Some(req);
                (StatusCode::OK, vec![0x25u8, 0x50, 0x44, 0x46])
            }
        }),
    );
    let srv = TestServer::spawn(app).await;

    let api = client_for(&srv.base_url, None);
    let request = ReportRequest {
        filter: ListFilter::default().with_module("users"),
        format: ReportFormat::Pdf,
        requested_by: "Ana".to_string(),
    };
    let blob = api.generate_report(&request).await.unwrap();

    assert_eq!(blob, vec![0x25, 0x50, 0x44, 0x46]);
    let seen = received.lock().unwrap().clone().unwrap();
    assert_eq!(seen.requested_by, "Ana");
    assert_eq!(seen.format, ReportFormat::Pdf);
    assert_eq!(seen.filter.module.as_deref(), Some("users"));
}
