//! Property-based tests

mod set_properties;
