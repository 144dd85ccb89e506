pub mod dispatch;
pub mod leads;
pub mod stats;

// Re-export all route functions
pub use dispatch::*;
pub use leads::*;
pub use stats::*;
