// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # APPHOST Core
//!
//! Domain, application, and presentation layers for the APPHOST web
//! application lifecycle service.
//!
//! # Architecture
//!
//! - **Domain:** `AppRecord` state machine, validation rules, registry contract
//! - **Application:** `AppLifecycleService` business operations
//! - **Infrastructure:** in-memory registry implementation
//! - **Presentation:** Axum HTTP facade with the uniform response envelope

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
