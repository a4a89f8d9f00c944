mod cache_tests;
mod support;
mod validation_tests;
