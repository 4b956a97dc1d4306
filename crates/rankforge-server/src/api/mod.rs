//! HTTP handlers, one module per resource.

pub mod health;
pub mod intake;
pub mod jobs;
pub mod plans;
pub mod research;

pub use health::health_routes;
pub use intake::intake_routes;
pub use jobs::job_routes;
pub use plans::plan_routes;
pub use research::research_routes;
