//! Integration tests for shellscope

mod helpers;

mod server_test;
mod transcript_test;
