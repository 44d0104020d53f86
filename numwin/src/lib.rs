//! numwin - bounded number windows with exact rolling averages
//!
//! Each category (primes, fibonacci, even, random) owns a window of the most
//! recently observed unique numbers. New batches from an upstream source are
//! merged FIFO into that window and a two-decimal average is reported.
//!
//! The crate is transport-agnostic: the HTTP surface and the real upstream
//! client live in `numwin-gateway`, which talks to this crate through the
//! [`Fetcher`] trait and [`WindowRegistry`].

pub mod category;
pub mod error;
pub mod fetch;
pub mod registry;
pub mod window;

pub use category::Category;
pub use error::{CategoryError, FetchError, WindowError, WindowResult};
pub use fetch::Fetcher;
pub use registry::{WindowRegistry, WindowResponse, WindowView};
pub use window::{Average, MergeResult, WindowStore, WindowValue};

/// Value type used by the gateway for upstream numbers.
pub type Number = i64;
