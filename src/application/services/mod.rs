//! Application services - Business logic orchestration

pub mod fallback;
pub mod responder;

#[cfg(test)]
pub(crate) mod testing;

pub use fallback::Outcome;
pub use responder::CommandResponder;
