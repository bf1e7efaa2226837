// Clinsync - Clinical record entity codecs
// Copyright (c) 2025 Clinsync Contributors
// Licensed under the MIT License

//! # Clinsync - Clinical record entity codecs
//!
//! Clinsync is the entity/JSON layer of a mobile clinical-data client. It
//! turns the JSON documents a clinical-record server returns into typed
//! domain entities for the on-device store, and turns local entities back
//! into JSON for upload or deletion.
//!
//! ## Overview
//!
//! This library provides:
//! - **Field extraction** by JSON path, with every failure attributed to an
//!   entity type and absolute path
//! - **Representation specs**, the `custom:(...)` field lists requested from
//!   the server, one per codec
//! - **Entity codecs** for patients, encounters, observations, concepts,
//!   cohorts, forms and users
//! - **Cohort payload discrimination** between the static and dynamic
//!   evaluation shapes
//! - **Delete identities**, the reduced encodings used to remove rows
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Codecs and sync orchestration
//! - [`adapters`] - Remote server and local store boundaries
//! - [`domain`] - Domain entities, paths, representation specs and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and codec diagnostics
//!
//! ## Quick Start
//!
//! ```rust
//! use clinsync::core::codec::{CodecContext, CohortCodec, EntityCodec};
//!
//! let context = CodecContext::default();
//! let cohort = CohortCodec
//!     .decode(&context, r#"{"uuid":"u1","name":"Flu Patients","dynamic":false}"#)
//!     .unwrap();
//!
//! assert_eq!(cohort.name.as_deref(), Some("Flu Patients"));
//! assert!(!cohort.dynamic);
//! ```
//!
//! ## Cohort Evaluations
//!
//! A cohort evaluation arrives in one of two shapes. The decoder picks the
//! shape from marker paths in the payload:
//!
//! ```rust
//! use clinsync::core::codec::{CodecContext, CohortDataCodec, EntityCodec};
//! use clinsync::domain::PayloadShape;
//!
//! let raw = r#"{
//!     "definition": {"uuid": "def-1", "name": "Recent visits"},
//!     "members": [{"uuid": "P1"}]
//! }"#;
//! let data = CohortDataCodec::default()
//!     .decode(&CodecContext::default(), raw)
//!     .unwrap();
//!
//! assert_eq!(data.shape, Some(PayloadShape::Dynamic));
//! assert_eq!(data.members[0].patient_uuid, "P1");
//! ```
//!
//! ## Error Handling
//!
//! Codec failures are [`domain::CodecError`] values carrying the entity type
//! and JSON path. At the crate boundary they convert into
//! [`domain::ClinsyncError`] with `?`.
//!
//! ## Logging
//!
//! Clinsync uses structured logging with the `tracing` crate. Recoverable
//! codec anomalies go to the decode context's diagnostic sink, which forwards
//! to `tracing` by default.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
