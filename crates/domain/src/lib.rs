//! Domain layer for chaoskit
//!
//! Contains the fault model, experiment definitions, observation records and
//! domain errors. This layer has no I/O or async dependencies and defines the
//! ubiquitous language shared by the scheduler and the injector.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::{DomainError, FaultError, InjectedError};
pub use value_objects::*;
