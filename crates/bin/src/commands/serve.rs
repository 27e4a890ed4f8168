//! Serve command - runs the warehouse HTTP server.

use tokio::signal::unix::{SignalKind, signal};

use warehouse::{Warehouse, server};

use crate::backend::{backend_label, create_backend};
use crate::cli::ServeArgs;

/// Run the warehouse server until SIGTERM or SIGINT.
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = create_backend(&args.backend_config).await?;
    let warehouse = Warehouse::new(backend);

    let app = server::router(warehouse.clone());

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "Server listening");

    // Print startup message
    println!("Warehouse server started on http://localhost:{}", local_addr.port());
    println!("Storage: {}", backend_label(&args.backend_config));
    println!();
    println!("Available endpoints:");
    println!("  GET    /                - Service banner");
    println!("  GET    /health          - Health check");
    println!("  POST   /mapas/create    - Create a map with its aisles");
    println!("  GET    /mapas/list      - List maps with shelf counts");
    println!("  POST   /mapas/search    - Search maps by id or name");
    println!("  DELETE /mapas/{{map_id}}  - Delete a map and everything under it");
    println!();
    println!("Press Ctrl+C to shutdown");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
                _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
            }
        })
        .await?;

    warehouse.close().await;
    println!("Server shut down");
    Ok(())
}
