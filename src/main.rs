mod errors;
mod handlers;
mod models;
mod store;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::sync::Arc;

use models::department::Department;
use models::employee::Employee;
use store::memory::MemoryStore;
use store::postgres::PgStore;
use store::DocumentStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // The store is built once here and injected into the handlers; nothing
    // else in the process touches a connection.
    let mut pg = None;
    let store: Arc<dyn DocumentStore> = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let backend = PgStore::connect(&database_url)
                .await
                .expect("Failed to connect to the database");
            backend
                .ensure_collections(&[Employee::COLLECTION, Department::COLLECTION])
                .await
                .expect("Failed to prepare collections");
            pg = Some(backend.clone());
            Arc::new(backend)
        }
        Err(_) => {
            warn!("DATABASE_URL not set, serving from an in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let data = web::Data::from(store);

    info!("Starting server at {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    if let Some(pg) = pg {
        pg.close().await;
    }

    Ok(())
}
