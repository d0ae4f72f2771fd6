use phonenumber::{country, Mode};
use validator::Validate;

use crate::error::ApiError;
use crate::users::dto::UserPayload;
use crate::users::password;
use crate::users::repo::NewUserAccount;

/// Turn an incoming payload into a store-ready record: check the field
/// constraints, re-render the phone number in US national format and replace
/// the plaintext password with its argon2 hash.
pub fn normalize_payload(payload: UserPayload) -> Result<NewUserAccount, ApiError> {
    payload.validate().map_err(ApiError::from_validation)?;

    let phone = phonenumber::parse(Some(country::US), &payload.primary_phone_number).map_err(
        |_| {
            ApiError::BadRequest("primary_phone_number must be a valid US telephone number".into())
        },
    )?;
    let primary_phone_number = phone.format().mode(Mode::National).to_string();

    let password_hash = password::hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(format!("error hashing password: {e}")))?;

    Ok(NewUserAccount {
        user_name: payload.user_name,
        first_name: payload.first_name,
        middle_name: payload.middle_name,
        last_name: payload.last_name,
        email: payload.email,
        primary_phone_number,
        password_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::password::verify_password;

    fn payload() -> UserPayload {
        UserPayload {
            user_name: "adalovelace".into(),
            first_name: Some("Ada".into()),
            middle_name: None,
            last_name: Some("Lovelace".into()),
            email: "ada@example.com".into(),
            primary_phone_number: "5555551234".into(),
            password: "analytical".into(),
        }
    }

    #[test]
    fn phone_number_is_rendered_in_national_format() {
        let record = normalize_payload(payload()).unwrap();
        assert_eq!(record.primary_phone_number, "(555) 555-1234");
    }

    #[test]
    fn password_is_replaced_by_a_verifiable_hash() {
        let record = normalize_payload(payload()).unwrap();
        assert_ne!(record.password_hash, "analytical");
        assert!(verify_password("analytical", &record.password_hash).unwrap());
    }

    #[test]
    fn profile_fields_pass_through_unchanged() {
        let record = normalize_payload(payload()).unwrap();
        assert_eq!(record.user_name, "adalovelace");
        assert_eq!(record.first_name.as_deref(), Some("Ada"));
        assert_eq!(record.middle_name, None);
        assert_eq!(record.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(record.email, "ada@example.com");
    }

    #[test]
    fn unparseable_phone_number_gets_the_fixed_message() {
        let mut p = payload();
        p.primary_phone_number = "not-a-phone".into();
        let err = normalize_payload(p).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(
            err.to_string(),
            "primary_phone_number must be a valid US telephone number"
        );
    }

    #[test]
    fn username_length_boundary() {
        let mut p = payload();
        p.user_name = "abc".into();
        let err = normalize_payload(p).unwrap_err();
        assert!(err.to_string().contains("user_name"));

        let mut p = payload();
        p.user_name = "abcd".into();
        assert!(normalize_payload(p).is_ok());

        let mut p = payload();
        p.user_name = "a".repeat(255);
        assert!(normalize_payload(p).is_ok());

        let mut p = payload();
        p.user_name = "a".repeat(256);
        assert!(normalize_payload(p).is_err());
    }

    #[test]
    fn username_must_be_alphanumeric() {
        let mut p = payload();
        p.user_name = "ada_lovelace".into();
        let err = normalize_payload(p).unwrap_err();
        assert!(err.to_string().contains("letters and digits"));
    }

    #[test]
    fn password_length_boundary() {
        let mut p = payload();
        p.password = "1234567".into();
        let err = normalize_payload(p).unwrap_err();
        assert!(err.to_string().contains("password"));

        let mut p = payload();
        p.password = "12345678".into();
        assert!(normalize_payload(p).is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut p = payload();
        p.email = "not-an-email".into();
        let err = normalize_payload(p).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn overlong_names_are_rejected() {
        let mut p = payload();
        p.first_name = Some("x".repeat(1025));
        let err = normalize_payload(p).unwrap_err();
        assert!(err.to_string().contains("first_name"));

        let mut p = payload();
        p.first_name = Some("x".repeat(1024));
        assert!(normalize_payload(p).is_ok());
    }

    #[test]
    fn multiple_violations_are_all_reported() {
        let mut p = payload();
        p.user_name = "abc".into();
        p.password = "short".into();
        let msg = normalize_payload(p).unwrap_err().to_string();
        assert!(msg.contains("user_name"));
        assert!(msg.contains("password"));
    }
}
