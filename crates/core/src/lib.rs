pub mod config;
pub mod domain;
pub mod dto;
pub mod errors;
pub mod mapper;

pub use domain::customer::{Customer, CustomerCategory, CustomerDraft, CustomerFocus, Status};
pub use domain::representative::{Representative, RepresentativeDraft};
pub use domain::EntityId;
pub use dto::{CustomerDto, RepresentativeDto};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use mapper::{CustomerMapper, RepresentativeMapper};
