mod common;

use common::{spawn_backend, EMAIL, LOCKED_EMAIL, PASSWORD, USER_ID};
use greenworld_client::views::{
    HomeView, LoginView, ProfileView, RegisterView, NETWORK_ERROR, UNEXPECTED_ERROR,
};
use greenworld_client::{ApiClient, Session};
use greenworld_shared::{ApiError, Role};

async fn signed_in(api: &ApiClient) -> Session {
    let session = Session::new();
    let mut login = LoginView::new();
    login.set_email(EMAIL);
    login.set_password(PASSWORD);
    assert!(login.submit(api, &session).await);
    session
}

#[tokio::test]
async fn test_sign_in_stores_user_in_session() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();
    let session = Session::new();

    let mut login = LoginView::new();
    login.set_email(EMAIL);
    login.set_password(PASSWORD);

    assert!(login.submit(&api, &session).await);
    assert!(!login.form.is_processing());
    assert!(login.form.errors().is_empty());

    let user = session.get().expect("session holds the user");
    assert_eq!(user.id, USER_ID);
    assert_eq!(user.points, 120);
    assert_eq!(user.role, Role::User);
    assert_eq!(user.recycling_goal, Some(15.0));
    assert!(matches!(HomeView::for_session(&session), HomeView::Member { .. }));
}

#[tokio::test]
async fn test_bad_password_leaves_session_unchanged() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();
    let session = Session::new();

    let mut login = LoginView::new();
    login.set_email(EMAIL);
    login.set_password("wrong");

    assert!(!login.submit(&api, &session).await);
    assert!(session.get().is_none());
    assert!(!login.form.is_processing());
    assert_eq!(login.form.base_error(), Some("Invalid email or password."));
}

#[tokio::test]
async fn test_unsuccessful_200_surfaces_errors() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();

    let err = api
        .sign_in(&greenworld_shared::Credentials {
            email: LOCKED_EMAIL.into(),
            password: "x".into(),
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Rejected(errors) => assert_eq!(errors.base_message(), Some("Account locked")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_sign_in_keeps_previous_user() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();
    let session = signed_in(&api).await;

    let mut login = LoginView::new();
    login.set_email(LOCKED_EMAIL);
    login.set_password("x");
    assert!(!login.submit(&api, &session).await);

    assert_eq!(session.user_id(), Some(USER_ID));
    assert_eq!(login.form.base_error(), Some("Account locked"));
}

#[tokio::test]
async fn test_unreachable_backend_is_generic_error() {
    let api = ApiClient::new("http://127.0.0.1:1").unwrap();
    let session = Session::new();

    let mut login = LoginView::new();
    login.set_email(EMAIL);
    login.set_password(PASSWORD);

    assert!(!login.submit(&api, &session).await);
    assert!(session.get().is_none());
    assert!(!login.form.is_processing());
    assert_eq!(login.form.base_error(), Some(NETWORK_ERROR));
}

#[tokio::test]
async fn test_register_field_errors() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();

    let mut register = RegisterView::new();
    register.registration.email = "new@example.com".into();
    assert!(!register.submit(&api).await);
    assert_eq!(register.form.error("name"), Some("can't be blank"));

    register.registration.name = "Tuan".into();
    assert!(register.submit(&api).await);
    assert!(register.form.errors().is_empty());
    assert!(!register.form.is_processing());
}

#[tokio::test]
async fn test_register_server_failure_is_unexpected_error() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();

    let mut register = RegisterView::new();
    register.registration.name = "Tuan".into();
    register.registration.email = "boom@example.com".into();

    assert!(!register.submit(&api).await);
    assert_eq!(register.form.base_error(), Some(UNEXPECTED_ERROR));
}

#[tokio::test]
async fn test_profile_requires_session() {
    assert!(ProfileView::for_session(&Session::new()).is_none());
}

#[tokio::test]
async fn test_profile_update_refreshes_session_user() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();
    let session = signed_in(&api).await;

    let mut profile = ProfileView::for_session(&session).unwrap();
    assert_eq!(profile.update.location, "Da Nang");
    assert_eq!(profile.update.recycling_goal, "15");

    profile.update.name = "Lan Nguyen".into();
    assert!(profile.submit(&api, &session).await);

    assert_eq!(backend.recorded().user_name, "Lan Nguyen");
    assert_eq!(session.get().unwrap().name, "Lan Nguyen");
}

#[tokio::test]
async fn test_profile_update_field_errors() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();
    let session = signed_in(&api).await;

    let mut profile = ProfileView::for_session(&session).unwrap();
    profile.update.email.clear();

    assert!(!profile.submit(&api, &session).await);
    assert_eq!(profile.form.error("email"), Some("can't be blank"));
    assert_eq!(session.get().unwrap().email, EMAIL);
}

#[tokio::test]
async fn test_profile_update_without_field_errors_is_generic() {
    let session = Session::new();
    session.set(serde_json::from_value(common::user_json("Lan")).unwrap());

    let offline = ApiClient::new("http://127.0.0.1:1").unwrap();
    let mut profile = ProfileView::for_session(&session).unwrap();
    assert!(!profile.submit(&offline, &session).await);
    assert_eq!(profile.form.base_error(), Some(NETWORK_ERROR));
    assert!(!profile.form.is_processing());

    // No cookie: the backend answers 401 without an errors object.
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();
    assert!(!profile.submit(&api, &session).await);
    assert_eq!(profile.form.base_error(), Some(UNEXPECTED_ERROR));
    assert_eq!(profile.form.errors().len(), 1);
    assert_eq!(backend.recorded().user_name, "Lan");
}

#[tokio::test]
async fn test_session_cookie_is_required_for_current_user() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();

    let err = api.current_user().await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));

    signed_in(&api).await;
    assert_eq!(api.current_user().await.unwrap().id, USER_ID);
}

#[tokio::test]
async fn test_sign_out_then_clear() {
    let backend = spawn_backend(vec![]).await;
    let api = ApiClient::from_config(&backend.config()).unwrap();
    let session = signed_in(&api).await;

    api.sign_out().await.unwrap();
    session.clear();

    assert!(backend.recorded().signed_out);
    assert_eq!(HomeView::for_session(&session), HomeView::Anonymous);
}
