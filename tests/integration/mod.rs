//! Service-level integration tests.

mod fakes;
mod resilience;
mod service_loop;
