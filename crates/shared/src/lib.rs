pub mod domain;
pub mod error;
pub mod protocol;

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
