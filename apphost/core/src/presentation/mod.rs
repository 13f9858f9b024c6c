// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`apphost-core`)
//!
//! HTTP surface that translates external requests into application service
//! calls. **No business logic lives here** — all real work is delegated to
//! `crate::application::AppLifecycleService`. This is the only layer that
//! maps errors to status codes and shapes the response envelope.

pub mod api;
