use crate::content::ArchiveMetaClient;
use crate::core::AppConfig;
use crate::routes::coursebase_routes;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{dev::Server, web::Data, App, HttpServer};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::net::TcpListener;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub struct CoursebaseWebServer {
    port: u16,
    server: Server,
}

impl CoursebaseWebServer {
    pub async fn build(configuration: AppConfig) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.coursebase_server_config.host,
            configuration.coursebase_server_config.port
        );

        let mysql_pool = MySqlPoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy_with(configuration.mysql.connect());

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, mysql_pool, configuration).await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub async fn run(
    listener: TcpListener,
    mysql_pool: MySqlPool,
    configuration: AppConfig,
) -> Result<Server, anyhow::Error> {
    let mysql_pool = Data::new(mysql_pool);
    let archive_client = Data::new(ArchiveMetaClient::new(
        configuration.archive.metadata_base_url.clone(),
        Duration::from_secs(configuration.archive.timeout_secs),
    ));
    let config = Data::new(configuration);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .supports_credentials();
        App::new()
            .configure(coursebase_routes)
            .app_data(mysql_pool.clone())
            .app_data(config.clone())
            .app_data(archive_client.clone())
            .wrap(TracingLogger::default())
            .wrap(cors)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
