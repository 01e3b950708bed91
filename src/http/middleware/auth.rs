use crate::service::auth_service::AuthService;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Identity of the authenticated caller, injected as a request extension.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

impl AuthedUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub async fn require_auth(
    State(auth): State<AuthService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&auth, &request) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => reject(StatusCode::UNAUTHORIZED, "unauthorized"),
    }
}

pub async fn require_admin(
    State(auth): State<AuthService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&auth, &request) {
        Some(user) if user.is_admin() => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Some(_) => reject(StatusCode::FORBIDDEN, "forbidden"),
        None => reject(StatusCode::UNAUTHORIZED, "unauthorized"),
    }
}

fn authenticate(auth: &AuthService, request: &Request<Body>) -> Option<AuthedUser> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))?;

    let claims = auth.verify_access(token).ok()?;
    let user_id = Uuid::parse_str(&claims.sub).ok()?;

    Some(AuthedUser {
        user_id,
        email: claims.email,
        role: claims.role,
    })
}

fn reject(status: StatusCode, message: &str) -> Response {
    Response::builder()
        .status(status)
        .body(Body::from(message.to_string()))
        .unwrap_or_else(|_| Response::new(Body::from(message.to_string())))
}
