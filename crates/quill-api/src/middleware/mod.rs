//! # HTTP Middleware
//!
//! Layers applied around the Quill router, outermost first:
//!
//! ```text
//! CORS → RequestContext → TraceLayer → Metrics → (Auth, protected routes only) → Handler
//! ```

pub mod cors;
pub mod metrics;
pub mod request_context;
pub mod tracing_layer;
