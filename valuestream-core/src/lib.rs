pub mod error;
pub mod export;
pub mod files;
pub mod findings;
pub mod intake;
pub mod layout;
pub mod metrics;
pub mod normalize;
pub mod seed;
pub mod validation;

pub use error::VsmError;
pub use layout::{layout, Canvas, Layout, LayoutEngine};
pub use metrics::Metrics;
pub use normalize::normalize;
pub use seed::Seed;
