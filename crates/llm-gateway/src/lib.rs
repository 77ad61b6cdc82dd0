//! `llm-gateway`: minimal client for OpenAI-compatible chat-completion APIs.
//!
//! The worklog engine only needs one thing from a language model: send a
//! prompt, get text back. This crate does exactly that and turns every
//! failure into a [`GatewayError`] variant the caller can act on.
//!
//! # Architecture
//!
//! ```text
//! Prompt { system, context, task }
//!     │
//!     ▼
//! ChatClient      ← POST {base_url}/chat/completions, bearer auth,
//!     │              bounded request timeout
//!     ▼
//! ChatResponse    ← first choice's message content
//!     │
//!     ▼
//! String          or GatewayError::{Unauthorized, RateLimited, Network, Provider}
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use llm_gateway::{ChatClient, ClientConfig, Prompt};
//!
//! let client = ChatClient::new(ClientConfig::default())?;
//! let prompt = Prompt::new("You are terse.", "", "Say hello.");
//! let text = client.complete(&api_key, &prompt).await?;
//! ```
//!
//! The client never holds on to the API key: it is passed per call.

pub mod client;
pub mod error;
pub mod types;


pub use client::ChatClient;
pub use error::GatewayError;
pub use types::{ClientConfig, Prompt};

pub type Result<T> = std::result::Result<T, GatewayError>;
