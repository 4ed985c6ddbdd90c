//! Test utilities and fixtures
//!
//! Mock discovery clients, a recording transport collaborator and
//! certificate fixtures used across the test suite. Also available to
//! downstream crates through the `test-utils` feature.

pub mod certificates;
pub mod smp;
pub mod transport;

pub use certificates::{receiver_certificate, self_signed_cert_der};
pub use smp::MockSmpClient;
pub use transport::{MockTransport, RecordedSend};
