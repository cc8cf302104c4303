//! Restaurant recommender server - HTTP API over the LightGCN ranker
//!
//! The server loads the user, item and restaurant snapshots once at startup,
//! then answers recommendation requests from shared, read-only state.
//!
//! # Features
//!
//! - **Recommendations**: top-K restaurants per user by embedding inner product
//! - **Middleware**: Compression, CORS, request ID tracking, structured logging
//! - **Configuration**: Environment variable and file-based configuration
//! - **Error Handling**: JSON error bodies with stable error codes
//! - **Graceful Shutdown**: SIGTERM / Ctrl+C handling
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /lightGCN/recommendation/{item_id}` - Top-K restaurants for a user id
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with store statistics
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::{ServerState, StoreStats};
