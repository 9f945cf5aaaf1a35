use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write;

use phone_number_auth::{
    app::AppState,
    config::Config,
    database::{create_pool, run_migrations},
    middlewares::create_cors,
    services::UserManager,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if let (Some(phone), Some(password)) = (
        config.bootstrap.superuser_phone.as_deref(),
        config.bootstrap.superuser_password.as_deref(),
    ) {
        let created = UserManager::new(pool.clone())
            .ensure_superuser(phone, password)
            .await
            .context("Failed to create bootstrap superuser")?;
        if created {
            log::info!("Created bootstrap superuser {phone}");
        }
    }

    let state = AppState::new(pool, &config);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(state.auth_middleware())
            .wrap(create_cors())
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
