//! Pure conversions between DTOs and entities.
//!
//! Foreign references are resolved by the caller; the mappers only check that
//! the resolved record is the one the DTO asked for.

use crate::domain::customer::{Customer, CustomerDraft};
use crate::domain::representative::{Representative, RepresentativeDraft};
use crate::dto::{CustomerDto, RepresentativeDto};
use crate::errors::DomainError;

pub struct CustomerMapper;

impl CustomerMapper {
    pub fn to_draft(dto: CustomerDto) -> CustomerDraft {
        CustomerDraft {
            company_name: dto.company_name.trim().to_string(),
            category: dto.category,
            focus: dto.focus,
            status: dto.status,
            email: normalize_optional(dto.email),
            phone: normalize_optional(dto.phone),
            website: normalize_optional(dto.website),
            notice: normalize_optional(dto.notice),
        }
    }

    pub fn to_dto(customer: &Customer) -> CustomerDto {
        CustomerDto {
            id: Some(customer.id.0),
            company_name: customer.company_name.clone(),
            category: customer.category,
            focus: customer.focus,
            status: customer.status,
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            website: customer.website.clone(),
            notice: customer.notice.clone(),
        }
    }
}

pub struct RepresentativeMapper;

impl RepresentativeMapper {
    /// Builds the draft around an already resolved `customer`.
    ///
    /// The id check never fails when `customer` was looked up by
    /// `dto.customer_id`, as the service resolver does. It guards direct
    /// callers that pass some other record.
    pub fn to_draft(
        dto: RepresentativeDto,
        customer: Customer,
    ) -> Result<RepresentativeDraft, DomainError> {
        if customer.id.0 != dto.customer_id {
            return Err(DomainError::Validation(format!(
                "customerId {} does not match resolved customer {}",
                dto.customer_id, customer.id
            )));
        }

        Ok(RepresentativeDraft {
            first_name: dto.first_name.trim().to_string(),
            last_name: dto.last_name.trim().to_string(),
            position: normalize_optional(dto.position),
            region: normalize_optional(dto.region),
            notice: normalize_optional(dto.notice),
            status: dto.status,
            last_visit: dto.last_visit,
            scheduled_visit: dto.scheduled_visit,
            emails: normalize_list(dto.emails),
            phone_numbers: normalize_list(dto.phone_numbers),
            customer,
        })
    }

    pub fn to_dto(representative: &Representative) -> RepresentativeDto {
        RepresentativeDto {
            id: Some(representative.id.0),
            first_name: representative.first_name.clone(),
            last_name: representative.last_name.clone(),
            position: representative.position.clone(),
            region: representative.region.clone(),
            notice: representative.notice.clone(),
            status: representative.status,
            last_visit: representative.last_visit,
            scheduled_visit: representative.scheduled_visit,
            emails: representative.emails.clone(),
            phone_numbers: representative.phone_numbers.clone(),
            customer_id: representative.customer.id.0,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn normalize_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
