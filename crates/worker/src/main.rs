use std::sync::Arc;

use coursehub_events::{
    AlertDispatcher, EmailConfig, EmailTransport, LogTransport, MessageTransport,
    NotificationStore, NotificationWorker, PgNotificationStore, RedisQueue, ReminderDispatcher,
    SubmissionScanner,
};
use coursehub_worker::config::ServiceConfig;
use coursehub_worker::telemetry;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServiceConfig::from_env().expect("Invalid worker configuration");
    telemetry::init(config.log_format);
    tracing::info!(
        reminder_queue = %config.worker.reminder_queue,
        alert_queue = %config.worker.alert_queue,
        scan_interval_secs = config.worker.scan_interval.as_secs(),
        "Loaded worker configuration"
    );

    // --- Database ---
    let pool = coursehub_db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    coursehub_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    coursehub_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Queues ---
    // Blocking pops hold their connection, so each consumer gets its own and
    // the scanner pushes through a third.
    let redis = redis::Client::open(config.redis_url.as_str()).expect("Invalid REDIS_URL");
    let reminder_consumer = RedisQueue::connect(&redis, &config.worker.reminder_queue)
        .await
        .expect("Failed to connect to Redis");
    let reminder_producer = RedisQueue::connect(&redis, &config.worker.reminder_queue)
        .await
        .expect("Failed to connect to Redis");
    let alert_consumer = RedisQueue::connect(&redis, &config.worker.alert_queue)
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Redis queues connected");

    // --- Delivery ---
    let transport: Arc<dyn MessageTransport> = match EmailConfig::from_env() {
        Some(email) => {
            tracing::info!(smtp_host = %email.smtp_host, "Delivering notifications by email");
            Arc::new(EmailTransport::new(email).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::info!("SMTP_HOST not set, delivering notifications to the log");
            Arc::new(LogTransport)
        }
    };

    // --- Worker ---
    let store: Arc<dyn NotificationStore> = Arc::new(PgNotificationStore::new(pool));
    let settings = config.worker.dispatch_settings();
    let worker = NotificationWorker::new(
        ReminderDispatcher::new(
            Arc::clone(&store),
            Arc::new(reminder_consumer),
            Arc::clone(&transport),
            settings,
        ),
        AlertDispatcher::new(
            Arc::clone(&store),
            Arc::new(alert_consumer),
            transport,
            settings,
        ),
        SubmissionScanner::new(store, Arc::new(reminder_producer), config.worker.scan_interval)
            .scan_on_start(config.worker.scan_on_start),
    );

    worker.start().await;

    shutdown_signal().await;
    worker.shutdown(config.shutdown_grace).await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
