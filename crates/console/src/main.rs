use std::sync::Arc;

use clap::Parser;

use warden_client::{ApiClient, AuthSession, InMemoryCredentialStore};
use warden_console::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    warden_observability::init();

    let cli = Cli::parse();

    let store = Arc::new(InMemoryCredentialStore::new());
    let auth = Arc::new(AuthSession::new(store));
    if let Some(credential) = &cli.credential {
        let claims = auth.sign_in(credential)?;
        tracing::debug!(user = %claims.sub, "session established");
    }

    let api = ApiClient::new(cli.api_url.clone(), auth);
    run(cli.command, &api).await
}
