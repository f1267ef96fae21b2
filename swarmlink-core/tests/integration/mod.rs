// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration Tests for SwarmLink Core
//!
//! These tests verify complete workflows from opening a node connection
//! through updating contacts to presence classification.
//!
//! Run with: cargo test --test integration

mod presence_workflow_test;
