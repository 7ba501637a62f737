//! Domain types, validation rules and the ports the onboarding pipeline
//! depends on.

pub mod account_number;
pub mod age;
pub mod attachment;
pub mod customer;
pub mod national_id;
pub mod ports;
pub mod validation;
