// ABOUTME: Re-exports command modules for stridesafe-cli
// ABOUTME: Provides the phase and normalize subcommands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod normalize;
pub mod phase;
