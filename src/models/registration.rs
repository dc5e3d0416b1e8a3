// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration input, checked locally before anything reaches the auth service.

use super::user::{PhysicalInfo, UserRole};
use validator::{Validate, ValidationError};

/// Sign-up form payload.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_health_details"))]
pub struct Registration {
    #[validate(length(min = 2, message = "Name must have at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: String,
    pub role: UserRole,
    pub physical_info: Option<PhysicalInfo>,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: UserRole,
        physical_info: Option<PhysicalInfo>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
            physical_info,
        }
    }
}

/// Flagged conditions or medication must come with details.
fn validate_health_details(reg: &Registration) -> Result<(), ValidationError> {
    let Some(info) = &reg.physical_info else {
        return Ok(());
    };

    if info.has_medical_conditions == Some(true) && is_blank(&info.medical_conditions_details) {
        let mut err = ValidationError::new("medical_conditions_details");
        err.message = Some("Please describe your medical conditions".into());
        return Err(err);
    }
    if info.takes_medication == Some(true) && is_blank(&info.medication_details) {
        let mut err = ValidationError::new("medication_details");
        err.message = Some("Please describe your medication".into());
        return Err(err);
    }
    Ok(())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}
