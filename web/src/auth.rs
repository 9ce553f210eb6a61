//! Bearer-token authentication.
//!
//! Token mechanics (JWT issuance, refresh) live outside this service;
//! the HTTP layer only needs to resolve `Authorization: Bearer <token>`
//! to an [`Actor`]. [`TokenVerifier`] is the seam, [`StaticTokenVerifier`]
//! the in-process implementation backed by a token table (the production
//! deployment hands admin tokens out of band; player tokens come from the
//! login service).

use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::collections::HashMap;
use std::sync::RwLock;
use turfbook_core::types::{Actor, AdminId, PlayerId};

/// Resolves an opaque bearer token to the actor it belongs to.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// The actor for `token`, or `None` for an unknown token.
    async fn verify(&self, token: &str) -> Option<Actor>;
}

/// Token-table verifier.
///
/// Admin tokens are configured at startup; player tokens are registered
/// when sessions are issued.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: RwLock<HashMap<String, Actor>>,
}

impl StaticTokenVerifier {
    /// Empty verifier; every request is anonymous until tokens are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifier with one admin token pre-registered.
    #[must_use]
    pub fn with_admin_token(token: &str) -> Self {
        let verifier = Self::new();
        verifier.insert(token, Actor::Admin(AdminId::new()));
        verifier
    }

    /// Register a token for an actor.
    pub fn insert(&self, token: &str, actor: Actor) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.to_string(), actor);
        }
    }

    /// Register a player token, returning the actor it maps to.
    pub fn insert_player(&self, token: &str, player: PlayerId) -> Actor {
        let actor = Actor::Player(player);
        self.insert(token, actor);
        actor
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Option<Actor> {
        self.tokens.read().ok()?.get(token).copied()
    }
}

/// The authenticated actor for the current request.
///
/// Extracts `Authorization: Bearer <token>` and resolves it through the
/// state's [`TokenVerifier`]. Missing or unknown tokens reject with 401.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

impl CurrentActor {
    /// The inner actor.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.0
    }

    /// Fail with 403 unless the actor is an admin.
    ///
    /// # Errors
    ///
    /// Returns a 403 error for player actors.
    pub fn require_admin(&self) -> Result<Actor, AppError> {
        if self.0.is_admin() {
            Ok(self.0)
        } else {
            Err(AppError::forbidden("admin access required"))
        }
    }

    /// Fail with 403 unless the actor is a player; returns the player id.
    ///
    /// # Errors
    ///
    /// Returns a 403 error for admin actors.
    pub fn require_player(&self) -> Result<PlayerId, AppError> {
        self.0
            .player_id()
            .ok_or_else(|| AppError::forbidden("player access required"))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;

        let actor = state
            .verifier
            .verify(token)
            .await
            .ok_or_else(|| AppError::unauthorized("invalid token"))?;
        Ok(Self(actor))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let verifier = StaticTokenVerifier::with_admin_token("s3cret");
        assert!(verifier.verify("nope").await.is_none());
        assert!(verifier.verify("s3cret").await.is_some_and(|a| a.is_admin()));
    }

    #[tokio::test]
    async fn player_tokens_resolve_to_player_actors() {
        let verifier = StaticTokenVerifier::new();
        let player = PlayerId::new();
        verifier.insert_player("tok", player);

        let actor = verifier.verify("tok").await.unwrap();
        assert_eq!(actor.player_id(), Some(player));
    }

    #[test]
    fn role_gates() {
        let admin = CurrentActor(Actor::Admin(AdminId::new()));
        let player = CurrentActor(Actor::Player(PlayerId::new()));

        assert!(admin.require_admin().is_ok());
        assert!(admin.require_player().is_err());
        assert!(player.require_player().is_ok());
        assert!(player.require_admin().is_err());
    }
}
