use db::models::{account, monitored_system};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::routes::common::format_timestamp;

#[derive(Debug, Deserialize, Validate)]
pub struct AccountRequest {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(max = 32, message = "phone must be at most 32 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct AccountResponse {
    pub account_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: String,
}

impl From<account::Model> for AccountResponse {
    fn from(a: account::Model) -> Self {
        Self {
            account_id: a.id,
            name: a.name,
            email: a.email,
            phone: a.phone,
            created_at: format_timestamp(&a.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SystemRequest {
    #[validate(length(min = 1, max = 100, message = "system_name must be between 1 and 100 characters"))]
    pub system_name: String,

    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,

    #[validate(ip(message = "ip_address must be a valid IP address"))]
    pub ip_address: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SystemResponse {
    pub system_id: i64,
    pub account_id: i64,
    pub system_name: String,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub registered_at: String,
}

impl From<monitored_system::Model> for SystemResponse {
    fn from(s: monitored_system::Model) -> Self {
        Self {
            system_id: s.id,
            account_id: s.account_id,
            system_name: s.system_name,
            ip_address: s.ip_address,
            location: s.location,
            registered_at: format_timestamp(&s.registered_at),
        }
    }
}
