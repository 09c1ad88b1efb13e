//! Chaos engineering framework for resilience testing.
//!
//! Provides tools for injecting faults and failures into code under test.
//!
//! # Overview
//!
//! The chaos framework consists of:
//! - `FaultInjector`: Applies one fault spec after a random probability draw
//! - `ChaosWrapper`: Subjects a wrapped operation to a list of fault specs
//! - `inject_async`: Runs a blocking injection on tokio's blocking pool
//!
//! # Example
//!
//! ```ignore
//! use domain::FaultSpec;
//! use infrastructure::chaos::ChaosWrapper;
//!
//! // Fail 30% of calls with a 503
//! let wrapper = ChaosWrapper::single(FaultSpec::error(503).with_probability(0.3));
//!
//! let result = wrapper.call(|| 42);
//! ```

mod chaos_wrapper;
mod fault_injector;

pub use chaos_wrapper::{
    ChaosWrapper, MONKEY_DURATION_MS, MONKEY_ERROR_CODE, MONKEY_MESSAGE, MONKEY_PROBABILITY,
};
pub use fault_injector::{FaultInjector, FaultInjectorConfig, inject_async};
