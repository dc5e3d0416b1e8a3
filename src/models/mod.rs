// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the session store.

pub mod lenient;
pub mod preferences;
pub mod registration;
pub mod user;

pub use preferences::{Appearance, FontSize, ResolvedTheme, Theme, HIGH_CONTRAST_CLASS};
pub use registration::Registration;
pub use user::{PhysicalInfo, StoredUser, User, UserGoal, UserRole, UserUpdate};
