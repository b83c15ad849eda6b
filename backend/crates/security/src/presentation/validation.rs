//! Login Body Validation
//!
//! The body is read as raw JSON (or a URL-encoded form) and checked field by
//! field so every problem is reported at once. Any other body is treated as
//! an empty object.

use std::collections::HashMap;

use axum::Form;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use kernel::error::app_error::AppError;
use kernel::validation::{ValidationIssues, json_type_name};
use platform::password::ClearTextPassword;
use serde_json::{Map, Value};

use crate::domain::value_object::email::Email;
use crate::presentation::dto::LoginRequest;

impl<S> FromRequest<S> for LoginRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let format = body_format(req.headers());
        let body = match format {
            BodyFormat::Json => {
                let bytes = Bytes::from_request(req, state).await?;
                if bytes.is_empty() {
                    Value::Object(Map::new())
                } else {
                    serde_json::from_slice::<Value>(&bytes)?
                }
            }
            BodyFormat::Form => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state).await?;
                // Form values are always strings
                Value::Object(
                    fields
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect(),
                )
            }
            BodyFormat::Other => Value::Object(Map::new()),
        };

        validate_login_body(&body)
    }
}

enum BodyFormat {
    Json,
    Form,
    Other,
}

fn body_format(headers: &HeaderMap) -> BodyFormat {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim);

    match mime {
        Some(m) if m.eq_ignore_ascii_case("application/json") => BodyFormat::Json,
        Some(m) if m.eq_ignore_ascii_case("application/x-www-form-urlencoded") => {
            BodyFormat::Form
        }
        _ => BodyFormat::Other,
    }
}

/// Check a parsed login body
///
/// Rules:
/// - `email`: required string, valid address
/// - `password`: required non-empty string
/// - `rememberMe`: optional boolean, default `false`
pub fn validate_login_body(body: &Value) -> Result<LoginRequest, AppError> {
    let mut issues = ValidationIssues::new();

    let Some(fields) = body.as_object() else {
        issues.push(
            "body",
            format!("Expected object, received {}", json_type_name(body)),
        );
        return Err(issues.into_error());
    };

    let email = match fields.get("email") {
        None => {
            issues.push("body.email", "Required");
            None
        }
        Some(Value::String(raw)) => match Email::parse(raw.as_str()) {
            Ok(email) => Some(email.into_inner()),
            Err(_) => {
                issues.push("body.email", "Invalid email address");
                None
            }
        },
        Some(other) => {
            issues.push("body.email", expected("string", other));
            None
        }
    };

    let password = match fields.get("password") {
        None => {
            issues.push("body.password", "Required");
            None
        }
        Some(Value::String(raw)) if raw.is_empty() => {
            issues.push("body.password", "Password is required");
            None
        }
        Some(Value::String(raw)) => Some(ClearTextPassword::new(raw.clone())),
        Some(other) => {
            issues.push("body.password", expected("string", other));
            None
        }
    };

    let remember_me = match fields.get("rememberMe") {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            issues.push("body.rememberMe", expected("boolean", other));
            false
        }
    };

    // A missing field always pushed an issue above
    match (email, password, issues.is_empty()) {
        (Some(email), Some(password), true) => Ok(LoginRequest {
            email,
            password,
            remember_me,
        }),
        _ => Err(issues.into_error()),
    }
}

fn expected(type_name: &str, received: &Value) -> String {
    format!("Expected {}, received {}", type_name, json_type_name(received))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use kernel::error::kind::ErrorKind;
    use serde_json::json;

    fn issue_paths(err: &AppError) -> Vec<(String, String)> {
        err.details()
            .and_then(Value::as_array)
            .map(|issues| {
                issues
                    .iter()
                    .map(|i| {
                        (
                            i["path"].as_str().unwrap_or_default().to_string(),
                            i["message"].as_str().unwrap_or_default().to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_valid_body() {
        let req = validate_login_body(&json!({
            "email": "a@b.com",
            "password": "x",
            "rememberMe": true
        }))
        .unwrap();
        assert_eq!(req.email, "a@b.com");
        assert!(req.remember_me);
    }

    #[test]
    fn test_remember_me_defaults_to_false() {
        let req = validate_login_body(&json!({"email": "a@b.com", "password": "x"})).unwrap();
        assert!(!req.remember_me);
    }

    #[test]
    fn test_invalid_email_and_empty_password() {
        let err = validate_login_body(&json!({"email": "not-an-email", "password": ""})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "Validation failed");
        assert_eq!(
            issue_paths(&err),
            vec![
                ("body.email".to_string(), "Invalid email address".to_string()),
                ("body.password".to_string(), "Password is required".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_fields() {
        let err = validate_login_body(&json!({})).unwrap_err();
        assert_eq!(
            issue_paths(&err),
            vec![
                ("body.email".to_string(), "Required".to_string()),
                ("body.password".to_string(), "Required".to_string()),
            ]
        );
    }

    #[test]
    fn test_wrong_types() {
        let err = validate_login_body(&json!({
            "email": 5,
            "password": null,
            "rememberMe": "yes"
        }))
        .unwrap_err();
        assert_eq!(
            issue_paths(&err),
            vec![
                ("body.email".to_string(), "Expected string, received number".to_string()),
                ("body.password".to_string(), "Expected string, received null".to_string()),
                ("body.rememberMe".to_string(), "Expected boolean, received string".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_object_body() {
        let err = validate_login_body(&json!(["a@b.com"])).unwrap_err();
        assert_eq!(
            issue_paths(&err),
            vec![("body".to_string(), "Expected object, received array".to_string())]
        );
    }

    #[test]
    fn test_only_remember_me_invalid() {
        let err = validate_login_body(&json!({
            "email": "a@b.com",
            "password": "x",
            "rememberMe": 1
        }))
        .unwrap_err();
        assert_eq!(issue_paths(&err).len(), 1);
    }

    #[tokio::test]
    async fn test_extractor_rejects_malformed_json() {
        let request = HttpRequest::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"email\":"))
            .unwrap();

        let err = LoginRequest::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.message().starts_with("Malformed JSON body"));
    }

    #[tokio::test]
    async fn test_extractor_treats_non_json_as_empty() {
        let request = HttpRequest::builder()
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("email=a@b.com"))
            .unwrap();

        let err = LoginRequest::from_request(request, &()).await.unwrap_err();
        assert_eq!(issue_paths(&err).len(), 2);
    }

    #[tokio::test]
    async fn test_extractor_accepts_form_body() {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40b.com&password=pw"))
            .unwrap();

        let req = LoginRequest::from_request(request, &()).await.unwrap();
        assert_eq!(req.email, "a@b.com");
        assert!(!req.remember_me);
    }

    #[tokio::test]
    async fn test_extractor_form_values_are_strings() {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40b.com&password=pw&rememberMe=true"))
            .unwrap();

        let err = LoginRequest::from_request(request, &()).await.unwrap_err();
        assert_eq!(
            issue_paths(&err),
            vec![(
                "body.rememberMe".to_string(),
                "Expected boolean, received string".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_extractor_accepts_charset_parameter() {
        let request = HttpRequest::builder()
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from(r#"{"email":"a@b.com","password":"pw"}"#))
            .unwrap();

        let req = LoginRequest::from_request(request, &()).await.unwrap();
        assert_eq!(req.email, "a@b.com");
    }
}
