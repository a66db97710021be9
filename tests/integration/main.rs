//! Integration test modules.

mod common;
mod export_flow_test;
mod recording_flow_test;
mod session_file_test;
