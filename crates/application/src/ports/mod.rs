//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod fault_injector_port;

#[cfg(test)]
pub use fault_injector_port::MockFaultInjectorPort;
pub use fault_injector_port::FaultInjectorPort;
