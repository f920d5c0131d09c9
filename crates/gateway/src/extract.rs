//! Request extractors that reject with the gateway's JSON error body

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::GatewayError;

/// Identifier from a single `:id` path segment, validated before any handler logic runs
#[derive(Debug, Clone, Copy)]
pub struct ValidUuid(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state).await?;

        let uuid = Uuid::parse_str(&id)
            .map_err(|_| GatewayError::InvalidRequest(format!("invalid identifier '{id}'")))?;

        Ok(Self(uuid))
    }
}

/// `Json` whose rejection is a [`GatewayError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(GatewayError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejection is a [`GatewayError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(GatewayError))]
pub struct ApiQuery<T>(pub T);
