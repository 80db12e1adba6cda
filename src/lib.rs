//! Multi-agent advisory core for free-form agricultural queries.
//!
//! A query flows through the orchestrator: the intent router picks the
//! agents, the location resolver enriches context (learning unknown
//! pincodes as it goes), soil and weather analysis run in parallel, crop
//! planning consumes both, and the aggregate becomes a structured prompt
//! for an external LLM renderer. Every external dependency sits behind an
//! explicit seam so failures degrade instead of propagating.

pub mod agents;
pub mod config;
pub mod error;
pub mod forecast;
pub mod knowledge;
pub mod location;
pub mod models;
pub mod retrieval;
pub mod store;
pub mod voice;

pub use agents::Orchestrator;
pub use config::Config;
pub use error::AdvisoryError;
