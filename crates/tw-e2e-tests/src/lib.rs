//! End-to-end tests for the traffic-priority chat server live in `tests/`.
//!
//! Each test drives the real router, interpreter, HTTP optimizer gateway and
//! chat-model client, with the external services replaced by `wiremock`.
