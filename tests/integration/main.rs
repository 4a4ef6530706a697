//! Integration tests

mod e2e_test;
mod lifecycle_test;
mod quote_test;
mod risk_test;
