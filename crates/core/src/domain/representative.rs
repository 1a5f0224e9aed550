use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, Status};
use crate::domain::EntityId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub region: Option<String>,
    pub notice: Option<String>,
    pub status: Status,
    pub last_visit: Option<NaiveDate>,
    pub scheduled_visit: Option<NaiveDate>,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub customer: Customer,
}

/// Representative contents with the customer reference already resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepresentativeDraft {
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub region: Option<String>,
    pub notice: Option<String>,
    pub status: Status,
    pub last_visit: Option<NaiveDate>,
    pub scheduled_visit: Option<NaiveDate>,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub customer: Customer,
}

impl RepresentativeDraft {
    pub fn into_representative(self, id: EntityId) -> Representative {
        Representative {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            position: self.position,
            region: self.region,
            notice: self.notice,
            status: self.status,
            last_visit: self.last_visit,
            scheduled_visit: self.scheduled_visit,
            emails: self.emails,
            phone_numbers: self.phone_numbers,
            customer: self.customer,
        }
    }
}
