//! Request and response shapes exchanged over the HTTP boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{CustomerCategory, CustomerFocus, Status};
use crate::errors::DomainError;

const MAX_NAME_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub company_name: String,
    pub category: CustomerCategory,
    pub focus: CustomerFocus,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativeDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub last_visit: Option<NaiveDate>,
    #[serde(default)]
    pub scheduled_visit: Option<NaiveDate>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    pub customer_id: i64,
}

impl CustomerDto {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("companyName", &self.company_name)?;
        if let Some(email) = self.email.as_deref().filter(|value| !value.trim().is_empty()) {
            require_email("email", email)?;
        }
        Ok(())
    }
}

impl RepresentativeDto {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("firstName", &self.first_name)?;
        require_name("lastName", &self.last_name)?;
        for email in self.emails.iter().filter(|value| !value.trim().is_empty()) {
            require_email("emails", email)?;
        }
        Ok(())
    }
}

fn require_name(field: &str, value: &str) -> Result<(), DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be blank")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn require_email(field: &str, value: &str) -> Result<(), DomainError> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::Validation(format!("{field} contains an invalid address `{trimmed}`"))),
    }
}
