//! The served configuration value.
//!
//! # Data Flow
//! ```text
//! startup:  source → fetch_with_retry → MessageEndpoint (initial value or empty)
//! read:     GET /message → MessageEndpoint::current() → Arc<ConfigValue>
//! refresh:  trigger → MessageEndpoint::refresh() → source.fetch() → atomic swap
//! ```

pub mod endpoint;
pub mod value;

pub use endpoint::{MessageEndpoint, MessageError};
pub use value::ConfigValue;
