//! Memory and emotional-pattern engine for a personal companion.
//!
//! Aura stores each conversational turn as a semantically searchable vector
//! tagged with structured emotional and cognitive metadata, and computes
//! pattern analytics over that metadata across arbitrary time windows.
//!
//! | Component | Role |
//! |-----------|------|
//! | **Embedding provider** | Text to a 384-dim vector (local ONNX model or feature hashing) |
//! | **Record store** | Durable, per-user partitioned records with similarity and time-range queries |
//! | **Emotion model** | Closed vocabularies: 22 emotions, 3 intensities, 8 cognitive-focus codes |
//! | **Pattern analyzer** | Distributions, dominant emotion, valence trend, recommendations |
//! | **Memory facade** | The entry point: validate, embed (bounded, cancellable), store, search, analyze |
//!
//! # Architecture
//!
//! - **Storage**: an in-memory arena of immutable records partitioned by user,
//!   written through a pooled SQLite database (WAL) and reloaded on open
//! - **Embeddings**: Local ONNX Runtime with all-MiniLM-L6-v2 (384 dimensions)
//! - **Search**: filter first, then exact cosine top-k
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite connection pool, schema, and migrations
//! - [`embedding`]: Text-to-vector embedding providers
//! - [`memory`]: Core engine: records, emotion model, store, search, analysis, facade
//! - [`server`]: MCP server setup for stdio and HTTP
//! - [`tools`]: MCP tool handlers over the memory facade

pub mod config;
pub mod db;
pub mod embedding;
pub mod memory;
pub mod server;
pub mod tools;
