//! Cross-module tests over a full [`crate::Processor`].

mod helpers;
mod pipeline;
mod search;
mod validation;
