//! Integration tests for gitk-graph
//!
//! End-to-end checks of the text-to-view pipeline, the history controller
//! and the command line binary.

mod cli;
mod pipeline;
mod test_utils;
