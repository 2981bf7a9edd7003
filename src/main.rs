use apirelay::{built_info, create_router, init, AppState, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading configuration
    dotenv::dotenv().ok();
    init()?;

    let config = Config::from_env();
    let state = AppState::with_config(config)?;

    let app = create_router(&state.config).with_state(state.clone());

    let addr = state.config.listen_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!(
        "{} {} listening on {}",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
