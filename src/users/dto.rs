use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::users::repo::UserAccount;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9]+$").unwrap();
}

/// Incoming create/update body. The plaintext password lives only for the
/// duration of the request; normalization replaces it with a hash.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserPayload {
    #[validate(
        length(
            min = 4,
            max = 255,
            message = "user_name must be between 4 and 255 characters"
        ),
        regex(
            path = *USERNAME_RE,
            message = "user_name must contain only letters and digits"
        )
    )]
    pub user_name: String,
    #[validate(length(max = 1024, message = "first_name must be at most 1024 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 1024, message = "middle_name must be at most 1024 characters"))]
    pub middle_name: Option<String>,
    #[validate(length(max = 1024, message = "last_name must be at most 1024 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub primary_phone_number: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "password must be between 8 and 255 characters"
    ))]
    pub password: String,
}

/// Outgoing representation of a user account. The password hash is not part
/// of this type, so it can never leak into a response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: i64,
    pub user_name: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub primary_phone_number: String,
}

impl From<UserAccount> for UserView {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            user_name: account.user_name,
            first_name: account.first_name,
            middle_name: account.middle_name,
            last_name: account.last_name,
            email: account.email,
            primary_phone_number: account.primary_phone_number,
        }
    }
}

/// Incoming pagination query. Absent values fall back to page 1, 20 rows.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// 1-based page index, defaults to 1.
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,
    /// Rows per page, defaults to 20.
    #[validate(range(min = 1, message = "page_size must be at least 1"))]
    pub page_size: Option<u32>,
}

/// Effective pagination, echoed back alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(20),
        }
    }
}

impl PageMeta {
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserView>,
    pub pagination: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            id: 7,
            user_name: "adalovelace".into(),
            first_name: Some("Ada".into()),
            middle_name: None,
            last_name: Some("Lovelace".into()),
            email: "ada@example.com".into(),
            primary_phone_number: "(555) 555-1234".into(),
            password_hash: "$argon2id$not-a-real-hash".into(),
        }
    }

    #[test]
    fn view_never_contains_password_material() {
        let json = serde_json::to_value(UserView::from(account())).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("password_hash"));
        assert_eq!(json["id"], 7);
        assert_eq!(json["user_name"], "adalovelace");
        assert_eq!(json["primary_phone_number"], "(555) 555-1234");
    }

    #[test]
    fn pagination_defaults_apply_when_absent() {
        let p = Pagination {
            page: None,
            page_size: None,
        };
        let meta = p.meta();
        assert_eq!(meta.page, 1);
        assert_eq!(meta.page_size, 20);
        assert_eq!(meta.offset(), 0);
        assert_eq!(meta.limit(), 20);
    }

    #[test]
    fn offset_is_zero_based_pages_times_size() {
        let p = Pagination {
            page: Some(3),
            page_size: Some(25),
        };
        let meta = p.meta();
        assert_eq!(meta.offset(), 50);
        assert_eq!(meta.limit(), 25);
    }

    #[test]
    fn adjacent_single_row_pages_have_adjacent_offsets() {
        let first = Pagination {
            page: Some(1),
            page_size: Some(1),
        }
        .meta();
        let second = Pagination {
            page: Some(2),
            page_size: Some(1),
        }
        .meta();
        assert_eq!(first.offset(), 0);
        assert_eq!(second.offset(), 1);
    }

    #[test]
    fn non_positive_pagination_is_rejected() {
        let zero_page = Pagination {
            page: Some(0),
            page_size: None,
        };
        assert!(zero_page.validate().is_err());
        let zero_size = Pagination {
            page: None,
            page_size: Some(0),
        };
        assert!(zero_size.validate().is_err());
    }

    #[test]
    fn list_response_shape() {
        let body = UserListResponse {
            data: vec![UserView::from(account())],
            pagination: PageMeta {
                page: 1,
                page_size: 20,
            },
        };
        let json = serde_json::to_value(body).unwrap();
        assert!(json["data"].is_array());
        assert_eq!(json["pagination"]["page"], 1);
        assert_eq!(json["pagination"]["page_size"], 20);
    }
}
