//! The API layer, containing web handlers, middleware and routing.

pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::ApiDoc;
pub use middleware::{API_KEY_HEADER, CorsConfig};
pub use router::{create_router, create_router_with_cors};
