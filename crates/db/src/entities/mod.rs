//! `SeaORM` entity definitions for the Fixhub schema.

pub mod branches;
pub mod brands;
pub mod companies;
pub mod customer_devices;
pub mod customers;
pub mod daily_opening_balances;
pub mod faults;
pub mod payment_entries;
pub mod payment_methods;
pub mod sea_orm_active_enums;
pub mod service_faults;
pub mod services;
pub mod users;
