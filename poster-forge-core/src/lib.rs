#![doc = "poster-forge-core: core pipeline library for poster-forge."]

//! This crate contains the provider-agnostic generation pipeline: templates, prompt
//! composition, caption parsing and fallback, idempotent storage provisioning and the
//! orchestrator that sequences them. Concrete provider and storage clients are not included
//! here; they implement the traits in [`contract`].
//!
//! # Usage
//! Build an [`pipeline::Orchestrator`] from a [`config::PipelineConfig`] and one implementation
//! of each contract, then call `run`, `render_poster`, `write_captions` or `setup_bucket`.

pub mod caption;
pub mod config;
pub mod contract;
pub mod pipeline;
pub mod prompt;
pub mod request;
pub mod storage;
pub mod template;
