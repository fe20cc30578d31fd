use anyhow::Context;
use rust_common::{init_tracing, run_with_graceful_shutdown, ShutdownCoordinator, TracingConfig};
use std::future::IntoFuture;
use std::sync::Arc;
use token_issuer::auth::{Authenticator, CredentialStore, StaticAuthenticator};
use token_issuer::config::{AuthMode, Config};
use token_issuer::jwt::{RsaSigner, SigningKey, TokenIssuer};
use token_issuer::{http, TokenService};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(
        &TracingConfig::default()
            .with_service_name("token-issuer")
            .with_log_level(config.log_level.clone())
            .with_json_output(config.log_json),
    )?;

    info!("Starting Token Issuer");

    // Parsed once; every request signs with this shared key.
    let key_bytes = config.key_source.load()?;
    let key = SigningKey::from_pem_or_der(&key_bytes).context("loading signing key")?;
    drop(key_bytes);

    info!(
        modulus_bits = key.modulus_bits(),
        key_id = config.issuer.key_id.as_deref().unwrap_or("-"),
        issuer = %config.issuer.issuer,
        audience = %config.issuer.audience,
        expires_secs = config.issuer.expires.as_secs(),
        "Signing key loaded"
    );

    let authenticator = build_authenticator(&config);
    let issuer = TokenIssuer::new(config.issuer.clone(), Arc::new(RsaSigner::new(Arc::new(key))));
    let app = http::router(TokenService::new(authenticator, issuer));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("Token Issuer listening on {}", addr);

    let coordinator = ShutdownCoordinator::new();
    let server = axum::serve(listener, app).with_graceful_shutdown(coordinator.subscribe().recv());

    run_with_graceful_shutdown(server.into_future(), coordinator, config.shutdown_timeout).await;

    info!("Token Issuer stopped");
    Ok(())
}

fn build_authenticator(config: &Config) -> Arc<dyn Authenticator> {
    match config.auth_mode {
        AuthMode::Static => {
            if config.credentials.is_empty() {
                warn!("AUTH_CREDENTIALS is empty; every request will be rejected");
            }
            let store = CredentialStore::new(config.credentials.clone());
            info!(entries = store.len(), "Using static credential store");
            Arc::new(store)
        }
        AuthMode::AllowAll => {
            warn!("AUTH_MODE=allow-all accepts any named credential");
            Arc::new(StaticAuthenticator::allow_all())
        }
        AuthMode::DenyAll => {
            warn!("AUTH_MODE=deny-all rejects every credential");
            Arc::new(StaticAuthenticator::deny_all())
        }
    }
}
