// ABOUTME: Helper modules for stridesafe-cli
// ABOUTME: Output formatting shared by the subcommands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
