//! Library integration tests against on-disk manifests and configuration.

mod resolution_tests;
