// Include client tests
#[path = "client_test.rs"]
mod client_tests;

// Include integration tests
#[path = "integration_tests.rs"]
mod integration_tests;

// Submission pipeline tests
#[path = "services/submission_test.rs"]
mod submission_tests;
