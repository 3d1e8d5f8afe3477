use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use member_roster::{
    get_postgres_pool,
    services::{
        data_stores::PostgresMemberStore, member_notifier::HttpMemberNotifier,
    },
    utils::{
        constants::{prod, APP_PORT, DATABASE_URL, NOTIFIER_BASE_URL},
        tracing::init_tracing,
    },
    AppState, Application,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .wrap_err("Failed to create Postgres connection pool")?;

    let http_client = reqwest::Client::builder()
        .timeout(prod::notifier::TIMEOUT)
        .build()?;
    let notifier = Arc::new(HttpMemberNotifier::new(
        NOTIFIER_BASE_URL.as_str().to_owned(),
        http_client,
    ));

    let member_store = Arc::new(PostgresMemberStore::new(pg_pool, notifier));
    let app_state = AppState::new(member_store);

    let app = Application::build(app_state, *APP_PORT)
        .wrap_err("Failed to build app")?;

    app.run().await.wrap_err("Server failed")?;

    Ok(())
}
