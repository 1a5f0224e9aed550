use serde::{Deserialize, Serialize};

use crate::domain::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerCategory {
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[serde(rename = "LEVEL_2")]
    Level2,
    #[serde(rename = "LEVEL_3")]
    Level3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerFocus {
    Builder,
    Manufacture,
    Trade,
    Mixed,
}

/// Shared by customers and representatives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl CustomerCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LEVEL_1" => Some(Self::Level1),
            "LEVEL_2" => Some(Self::Level2),
            "LEVEL_3" => Some(Self::Level3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Level1 => "LEVEL_1",
            Self::Level2 => "LEVEL_2",
            Self::Level3 => "LEVEL_3",
        }
    }
}

impl CustomerFocus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUILDER" => Some(Self::Builder),
            "MANUFACTURE" => Some(Self::Manufacture),
            "TRADE" => Some(Self::Trade),
            "MIXED" => Some(Self::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Builder => "BUILDER",
            Self::Manufacture => "MANUFACTURE",
            Self::Trade => "TRADE",
            Self::Mixed => "MIXED",
        }
    }
}

impl Status {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: EntityId,
    pub company_name: String,
    pub category: CustomerCategory,
    pub focus: CustomerFocus,
    pub status: Status,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub notice: Option<String>,
}

/// A customer that has not been assigned an id yet, or the replacement
/// contents for an existing row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerDraft {
    pub company_name: String,
    pub category: CustomerCategory,
    pub focus: CustomerFocus,
    pub status: Status,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub notice: Option<String>,
}

impl CustomerDraft {
    pub fn into_customer(self, id: EntityId) -> Customer {
        Customer {
            id,
            company_name: self.company_name,
            category: self.category,
            focus: self.focus,
            status: self.status,
            email: self.email,
            phone: self.phone,
            website: self.website,
            notice: self.notice,
        }
    }
}
