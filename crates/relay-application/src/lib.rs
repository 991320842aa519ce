//! Application Layer - Tool Relay
//!
//! Use cases that orchestrate the domain types:
//!
//! - [`ToolRegistry`]: registers tools, lists descriptors, validates and
//!   invokes executors
//! - [`ModelBridge`]: sends a conversation to a function-calling model and
//!   resolves any requested function call through a [`ToolInvoker`]
//!
//! This crate depends only on `relay-domain` and runtime-agnostic
//! libraries; transports and providers live further out.
//!
//! [`ToolInvoker`]: relay_domain::ports::ToolInvoker

pub mod use_cases;

pub use use_cases::*;
