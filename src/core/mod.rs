//! Core conversion logic, independent of any front-end

pub mod cache;
pub mod clock;
pub mod config;
pub mod controller;
pub mod convert;
pub mod currency;
pub mod debounce;
pub mod error;
pub mod format;
pub mod log;
pub mod provider;
pub mod rates;

// Re-export main types for cleaner imports
pub use cache::{RateCache, RateSnapshot, RateTable};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{InteractionController, Renderer, Selection};
pub use convert::{ConversionEngine, ConversionRequest, ConversionResult};
pub use currency::CurrencyCode;
pub use error::{ConvertError, FetchError};
pub use provider::RateProvider;
pub use rates::RateSource;
