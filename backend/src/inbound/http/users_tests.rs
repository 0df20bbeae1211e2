//! Tests for the account page handlers.

use super::*;
use crate::inbound::http::test_utils::{
    PASSWORD, cookie_named, flash_notice, location, login_cookie, memory_state, page_app,
    seed_user,
};
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn state() -> HttpState {
    memory_state()
}

fn registration(password2: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", "Ada Lovelace".to_owned()),
        ("email", "ada@example.com".to_owned()),
        ("username", "ada".to_owned()),
        ("password", PASSWORD.to_owned()),
        ("password2", password2.to_owned()),
    ]
}

fn error_messages(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error["message"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[case("/users/register", "register")]
#[case("/users/login", "login")]
#[actix_web::test]
async fn forms_render(state: HttpState, #[case] uri: &str, #[case] template: &str) {
    let app = test::init_service(page_app(state)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["template"], template);
}

#[rstest]
#[actix_web::test]
async fn mismatched_confirmation_registers_nobody(state: HttpState) {
    let app = test::init_service(page_app(state.clone())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_form(registration("something else"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["template"], "register");
    assert_eq!(body["form"]["username"], "ada");
    assert_eq!(error_messages(&body), ["Passwords do not match"]);

    let credentials = LoginCredentials::try_from_parts("ada", PASSWORD).expect("credentials");
    assert_eq!(
        state.accounts.verify_credentials(&credentials).await,
        Err(AuthError::NoSuchUser)
    );
}

#[rstest]
#[actix_web::test]
async fn whitespace_password_registers_and_logs_in(state: HttpState) {
    let app = test::init_service(page_app(state.clone())).await;
    let form = [
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("username", "ada"),
        ("password", "   "),
        ("password2", "   "),
    ];

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_form(form)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/users/login"));

    let credentials = LoginCredentials::try_from_parts("ada", "   ").expect("credentials");
    assert!(state.accounts.verify_credentials(&credentials).await.is_ok());
}

#[rstest]
#[actix_web::test]
async fn registration_sends_user_to_login(state: HttpState) {
    let app = test::init_service(page_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_form(registration(PASSWORD))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/users/login"));
    assert_eq!(
        flash_notice(&res),
        Some(Notice::success("You are now registered and can log in"))
    );
    assert!(cookie_named(&res, "session").is_none());

    login_cookie(&app, "ada").await;
}

#[rstest]
#[actix_web::test]
async fn taken_username_is_a_field_error(state: HttpState) {
    seed_user(&state, "Ada").await;
    let app = test::init_service(page_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/register")
            .set_form(registration(PASSWORD))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(error_messages(&body), ["Username is already taken"]);
}

#[rstest]
#[case("ada", "wrong", "Wrong password")]
#[case("nobody", PASSWORD, "No user found")]
#[case("", "", "Missing credentials")]
#[actix_web::test]
async fn rejected_login_returns_to_form(
    state: HttpState,
    #[case] username: &str,
    #[case] password: &str,
    #[case] note: &str,
) {
    seed_user(&state, "Ada").await;
    let app = test::init_service(page_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/login")
            .set_form([("username", username), ("password", password)])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/users/login"));
    assert_eq!(flash_notice(&res), Some(Notice::danger(note)));
    assert!(cookie_named(&res, "session").is_none());
}

#[rstest]
#[actix_web::test]
async fn login_restores_user_on_later_requests(state: HttpState) {
    seed_user(&state, "Ada").await;
    let app = test::init_service(page_app(state)).await;
    let session = login_cookie(&app, "ada").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/").cookie(session).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["user"]["name"], "Ada");
    assert!(body["user"].get("passwordHash").is_none());
}

#[rstest]
#[actix_web::test]
async fn logout_purges_session(state: HttpState) {
    seed_user(&state, "Ada").await;
    let app = test::init_service(page_app(state)).await;
    let session = login_cookie(&app, "ada").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/logout")
            .cookie(session)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/users/login"));
    assert_eq!(flash_notice(&res), Some(Notice::success("You are logged out")));
    let expired = cookie_named(&res, "session").expect("removal cookie");
    assert_eq!(expired.value(), "");
}
