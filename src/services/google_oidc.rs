// SPDX-License-Identifier: MIT
// Copyright 2026 Marathon Calendar contributors

//! Verification of Google-signed RS256 tokens.
//!
//! One verifier type serves two token profiles:
//! - Firebase Auth ID tokens presented by the browser at sign-in
//! - Google OIDC tokens attached by Cloud Scheduler to the reminder trigger
//!
//! Signing keys are fetched from the profile's JWKS endpoint and cached for
//! the `max-age` the endpoint advertises.

use anyhow::Context;
use axum::http::HeaderValue;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, RwLock};

const GOOGLE_DISCOVERY_URL: &str = "https://accounts.google.com/.well-known/openid-configuration";
const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const CLOCK_SKEW_SECS: u64 = 60;

/// Signed-in user extracted from a valid Firebase ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct FirebaseIdentity {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
}

/// Verified scheduler principal extracted from a valid OIDC token.
#[derive(Debug, Clone)]
pub struct VerifiedTaskPrincipal {
    pub email: String,
    pub subject: String,
    pub audience: String,
}

/// OIDC verification error categories.
#[derive(Debug, Clone)]
pub enum OidcError {
    /// The token is missing/invalid or claims do not match expectations.
    Forbidden(String),
    /// A transient infrastructure failure occurred (safe to retry).
    Transient(String),
}

/// Where a profile's signing keys come from.
#[derive(Debug, Clone)]
enum KeySource {
    /// Google's OpenID discovery document, falling back to the v3 certs URL.
    GoogleDiscovery,
    /// A fixed JWKS URL.
    Jwks(String),
}

/// Expected issuer, audience and key source for one kind of token.
#[derive(Debug, Clone)]
pub struct TokenProfile {
    issuers: Vec<String>,
    audience: String,
    service_account_email: Option<String>,
    keys: KeySource,
}

impl TokenProfile {
    /// Firebase Auth ID tokens for `project_id`.
    pub fn firebase(project_id: &str) -> Self {
        Self {
            issuers: vec![format!("{}{}", FIREBASE_ISSUER_PREFIX, project_id)],
            audience: project_id.to_string(),
            service_account_email: None,
            keys: KeySource::Jwks(FIREBASE_JWKS_URL.to_string()),
        }
    }

    /// Google OIDC tokens minted for `service_account_email`, addressed to
    /// `audience`.
    pub fn scheduler(audience: &str, service_account_email: &str) -> Self {
        Self {
            issuers: vec![
                "https://accounts.google.com".to_string(),
                "accounts.google.com".to_string(),
            ],
            audience: canonicalize_audience(audience),
            service_account_email: Some(service_account_email.to_string()),
            keys: KeySource::GoogleDiscovery,
        }
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// First accepted issuer (the one test tokens should carry).
    pub fn issuer(&self) -> &str {
        self.issuers.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Clone)]
enum VerifierMode {
    Remote,
    StaticKey {
        kid: String,
        decoding_key: Arc<DecodingKey>,
    },
}

#[derive(Clone)]
struct DiscoveryCacheEntry {
    jwks_uri: String,
    expires_at: Instant,
}

#[derive(Clone)]
struct JwksCacheEntry {
    keys_by_kid: HashMap<String, Arc<DecodingKey>>,
    expires_at: Instant,
}

/// Verifier for Google-signed RS256 tokens of one profile.
pub struct GoogleOidcVerifier {
    http_client: reqwest::Client,
    profile: TokenProfile,
    mode: VerifierMode,
    discovery_cache: RwLock<Option<DiscoveryCacheEntry>>,
    jwks_cache: RwLock<Option<JwksCacheEntry>>,
    refresh_lock: Mutex<()>,
}

impl GoogleOidcVerifier {
    /// Create a production verifier that fetches and caches JWKS keys.
    pub fn new(profile: TokenProfile) -> anyhow::Result<Self> {
        tracing::info!(
            audience = %profile.audience,
            issuer = %profile.issuer(),
            "Initialized OIDC verifier"
        );
        Self::with_mode(profile, VerifierMode::Remote)
    }

    /// Create a verifier with a static RSA public key.
    ///
    /// This is intended for deterministic local/integration tests.
    pub fn new_with_static_key(
        profile: TokenProfile,
        kid: impl Into<String>,
        decoding_key: DecodingKey,
    ) -> anyhow::Result<Self> {
        let kid = kid.into();
        if kid.trim().is_empty() {
            anyhow::bail!("static OIDC kid must not be empty");
        }

        Self::with_mode(
            profile,
            VerifierMode::StaticKey {
                kid,
                decoding_key: Arc::new(decoding_key),
            },
        )
    }

    fn with_mode(profile: TokenProfile, mode: VerifierMode) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building OIDC HTTP client")?;

        Ok(Self {
            http_client,
            profile,
            mode,
            discovery_cache: RwLock::new(None),
            jwks_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn profile(&self) -> &TokenProfile {
        &self.profile
    }

    /// Verify a Firebase ID token and return the signed-in user.
    pub async fn verify_firebase_token(&self, token: &str) -> Result<FirebaseIdentity, OidcError> {
        let claims: FirebaseIdTokenClaims = self.verify_claims(token).await?;

        if claims.sub.is_empty() || claims.sub.len() > 128 {
            return Err(OidcError::Forbidden("invalid sub claim".to_string()));
        }

        if let Some(auth_time) = claims.auth_time {
            if auth_time as u64 > now_unix_secs() + CLOCK_SKEW_SECS {
                return Err(OidcError::Forbidden(
                    "auth_time claim is in the future".to_string(),
                ));
            }
        }

        Ok(FirebaseIdentity {
            uid: claims.sub,
            display_name: claims.name,
            photo_url: claims.picture,
            email: claims.email,
        })
    }

    /// Verify a scheduler OIDC bearer token from an Authorization header.
    pub async fn verify_scheduler_token(
        &self,
        auth_header: Option<&HeaderValue>,
    ) -> Result<VerifiedTaskPrincipal, OidcError> {
        let token = extract_bearer_token(auth_header)?;
        let claims: GoogleIdTokenClaims = self.verify_claims(token).await?;

        tracing::debug!(
            email = claims.email.as_deref().unwrap_or("<missing>"),
            email_verified = ?claims.email_verified,
            subject = %claims.sub,
            audience = %claims.aud,
            issuer = %claims.iss,
            "Scheduler OIDC claims"
        );

        let email = claims
            .email
            .ok_or_else(|| OidcError::Forbidden("missing email claim".to_string()))?;

        if let Some(expected) = &self.profile.service_account_email {
            if &email != expected {
                return Err(OidcError::Forbidden(format!(
                    "unexpected service account email: {email}"
                )));
            }
        }

        match claims.email_verified {
            Some(true) => {}
            Some(false) => {
                return Err(OidcError::Forbidden(
                    "email_verified claim is false".to_string(),
                ));
            }
            None => {
                return Err(OidcError::Forbidden(
                    "email_verified claim is missing".to_string(),
                ));
            }
        }

        Ok(VerifiedTaskPrincipal {
            email,
            subject: claims.sub,
            audience: claims.aud,
        })
    }

    /// Check signature, issuer, audience, expiry and `iat`, then decode the
    /// claims.
    async fn verify_claims<C>(&self, token: &str) -> Result<C, OidcError>
    where
        C: DeserializeOwned + IssuedAt,
    {
        let header = decode_header(token)
            .map_err(|e| OidcError::Forbidden(format!("invalid JWT header: {e}")))?;

        if header.alg != Algorithm::RS256 {
            return Err(OidcError::Forbidden(format!(
                "unexpected JWT alg: {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| OidcError::Forbidden("missing JWT kid".to_string()))?;

        let decoding_key = self.decoding_key_for_kid(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&self.profile.issuers);
        validation.set_audience(&[self.profile.audience.as_str()]);
        validation.validate_nbf = true;
        validation.leeway = CLOCK_SKEW_SECS;

        let token_data = decode::<C>(token, decoding_key.as_ref(), &validation)
            .map_err(|e| OidcError::Forbidden(format!("JWT validation failed: {e}")))?;

        validate_iat(token_data.claims.iat())?;
        Ok(token_data.claims)
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<Arc<DecodingKey>, OidcError> {
        match &self.mode {
            VerifierMode::StaticKey {
                kid: static_kid,
                decoding_key,
            } => {
                if kid == static_kid {
                    return Ok(decoding_key.clone());
                }

                return Err(OidcError::Forbidden(format!(
                    "unknown JWT kid for static verifier: {kid}"
                )));
            }
            VerifierMode::Remote => {}
        }

        if let Some(key) = self.lookup_cached_key(kid).await {
            return Ok(key);
        }

        for force_refresh in [false, true] {
            self.refresh_jwks(force_refresh).await?;
            if let Some(key) = self.lookup_cached_key(kid).await {
                return Ok(key);
            }
        }

        Err(OidcError::Forbidden(format!(
            "JWT kid not found in JWKS after refresh: {kid}"
        )))
    }

    async fn lookup_cached_key(&self, kid: &str) -> Option<Arc<DecodingKey>> {
        let cache = self.jwks_cache.read().await;
        let now = Instant::now();
        cache
            .as_ref()
            .filter(|entry| entry.expires_at > now)
            .and_then(|entry| entry.keys_by_kid.get(kid))
            .cloned()
    }

    async fn refresh_jwks(&self, force_refresh: bool) -> Result<(), OidcError> {
        let _guard = self.refresh_lock.lock().await;

        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if cache
                .as_ref()
                .is_some_and(|entry| entry.expires_at > Instant::now())
            {
                return Ok(());
            }
        }

        let jwks_uri = match &self.profile.keys {
            KeySource::Jwks(url) => url.clone(),
            KeySource::GoogleDiscovery => self.resolve_jwks_uri(force_refresh).await?,
        };

        tracing::debug!(jwks_uri = %jwks_uri, "Refreshing JWKS cache");

        let response = self
            .http_client
            .get(&jwks_uri)
            .send()
            .await
            .map_err(|e| OidcError::Transient(format!("JWKS request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(OidcError::Transient(format!(
                "JWKS request returned status {}",
                response.status()
            )));
        }

        let ttl = cache_ttl_from_headers(response.headers(), DEFAULT_CACHE_TTL);

        let jwks: Jwks = response
            .json()
            .await
            .map_err(|e| OidcError::Transient(format!("invalid JWKS JSON: {e}")))?;

        let keys_by_kid = usable_keys(jwks);
        if keys_by_kid.is_empty() {
            return Err(OidcError::Transient(
                "JWKS response did not include any usable RSA keys".to_string(),
            ));
        }

        *self.jwks_cache.write().await = Some(JwksCacheEntry {
            keys_by_kid,
            expires_at: Instant::now() + ttl,
        });

        tracing::debug!(ttl_secs = ttl.as_secs(), "JWKS cache refreshed");
        Ok(())
    }

    async fn resolve_jwks_uri(&self, force_refresh: bool) -> Result<String, OidcError> {
        if !force_refresh {
            let cache = self.discovery_cache.read().await;
            if let Some(entry) = cache
                .as_ref()
                .filter(|entry| entry.expires_at > Instant::now())
            {
                return Ok(entry.jwks_uri.clone());
            }
        }

        let cached_jwks_uri = self
            .discovery_cache
            .read()
            .await
            .as_ref()
            .map(|entry| entry.jwks_uri.clone());

        let response = self.http_client.get(GOOGLE_DISCOVERY_URL).send().await;
        match response {
            Ok(resp) if resp.status().is_success() => {
                let ttl = cache_ttl_from_headers(resp.headers(), DEFAULT_CACHE_TTL);
                let discovery: OpenIdConfig = resp
                    .json()
                    .await
                    .map_err(|e| OidcError::Transient(format!("invalid discovery JSON: {e}")))?;

                *self.discovery_cache.write().await = Some(DiscoveryCacheEntry {
                    jwks_uri: discovery.jwks_uri.clone(),
                    expires_at: Instant::now() + ttl,
                });

                Ok(discovery.jwks_uri)
            }
            Ok(resp) => {
                tracing::warn!(
                    status = %resp.status(),
                    "OIDC discovery returned non-success status; using fallback JWKS URI"
                );
                Ok(cached_jwks_uri.unwrap_or_else(|| GOOGLE_JWKS_URL.to_string()))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "OIDC discovery request failed; using fallback JWKS URI"
                );
                Ok(cached_jwks_uri.unwrap_or_else(|| GOOGLE_JWKS_URL.to_string()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenIdConfig {
    jwks_uri: String,
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    alg: Option<String>,
    n: String,
    e: String,
    #[serde(rename = "use")]
    use_: Option<String>,
}

/// Claims that carry an issued-at time.
trait IssuedAt {
    fn iat(&self) -> Option<usize>;
}

#[derive(Debug, Deserialize)]
struct GoogleIdTokenClaims {
    iss: String,
    aud: String,
    sub: String,
    iat: Option<usize>,
    email: Option<String>,
    email_verified: Option<bool>,
}

impl IssuedAt for GoogleIdTokenClaims {
    fn iat(&self) -> Option<usize> {
        self.iat
    }
}

#[derive(Debug, Deserialize)]
struct FirebaseIdTokenClaims {
    sub: String,
    iat: Option<usize>,
    auth_time: Option<usize>,
    name: Option<String>,
    picture: Option<String>,
    email: Option<String>,
}

impl IssuedAt for FirebaseIdTokenClaims {
    fn iat(&self) -> Option<usize> {
        self.iat
    }
}

/// RSA signing keys from a JWKS document, by kid.
fn usable_keys(jwks: Jwks) -> HashMap<String, Arc<DecodingKey>> {
    let mut keys_by_kid = HashMap::new();

    for jwk in jwks.keys {
        if jwk.kty != "RSA" || jwk.kid.trim().is_empty() {
            continue;
        }
        if jwk.alg.as_deref().is_some_and(|alg| alg != "RS256") {
            continue;
        }
        if jwk.use_.as_deref().is_some_and(|u| u != "sig") {
            continue;
        }

        match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
            Ok(key) => {
                keys_by_kid.insert(jwk.kid, Arc::new(key));
            }
            Err(e) => {
                tracing::warn!(error = %e, kid = %jwk.kid, "Skipping invalid RSA JWKS key");
            }
        }
    }

    keys_by_kid
}

/// Bearer token from an `Authorization` header value.
pub fn extract_bearer_token(auth_header: Option<&HeaderValue>) -> Result<&str, OidcError> {
    let value = auth_header
        .ok_or_else(|| OidcError::Forbidden("missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| OidcError::Forbidden("invalid Authorization header".to_string()))?;

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        OidcError::Forbidden("Authorization header must be Bearer token".to_string())
    })?;

    if token.is_empty() {
        return Err(OidcError::Forbidden("Bearer token is empty".to_string()));
    }

    Ok(token)
}

fn validate_iat(iat: Option<usize>) -> Result<(), OidcError> {
    let now = now_unix_secs();

    let Some(iat) = iat else {
        return Err(OidcError::Forbidden("missing iat claim".to_string()));
    };

    if iat as u64 > now + CLOCK_SKEW_SECS {
        return Err(OidcError::Forbidden(
            "iat claim is in the future".to_string(),
        ));
    }

    Ok(())
}

fn cache_ttl_from_headers(headers: &reqwest::header::HeaderMap, fallback: Duration) -> Duration {
    headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_cache_control_max_age)
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

fn parse_cache_control_max_age(value: &str) -> Option<u64> {
    value.split(',').find_map(|directive| {
        directive
            .trim()
            .strip_prefix("max-age=")
            .and_then(|raw| raw.trim_matches('"').parse::<u64>().ok())
    })
}

fn canonicalize_audience(audience: &str) -> String {
    audience.trim_end_matches('/').to_string()
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
