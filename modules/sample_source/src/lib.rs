// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Sample sources publishing raw position readings on the event bus.

pub mod replay_source;
