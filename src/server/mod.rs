pub mod error;
pub mod http;
pub mod params;
pub mod routes;


pub use error::ApiError;
pub use http::{build_app, start_server};
pub use routes::{create_router, AppState};
