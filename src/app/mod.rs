// Application layer: 對外介面 (API 動作與主控台摘要)

pub mod api;
pub mod summary;

pub use api::{ApiRequest, ApiResponse, ApiService};
pub use summary::render_summary;
