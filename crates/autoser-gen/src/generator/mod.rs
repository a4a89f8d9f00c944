pub mod cache;
pub mod candidates;
pub mod codegen;
pub mod compilation;
pub mod diagnostics;
pub mod fields;
pub mod markers;
pub mod metrics;
pub mod orchestrator;
pub mod policy;
pub mod semantic;
pub mod validator;

#[cfg(test)]
mod tests;
