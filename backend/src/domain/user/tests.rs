//! Tests for the registered user model.

use super::*;
use chrono::NaiveDate;
use rstest::rstest;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
fn user_id_accepts_uuid() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.to_string(), VALID_ID);
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("42", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_values(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn random_ids_differ() {
    assert_ne!(UserId::random(), UserId::random());
}

#[rstest]
#[case("Jonas Jonaitis")]
#[case("  Ada   Lovelace  ")]
#[case("Jo Jo")]
#[case("Marija Teresė Žemaitė")]
fn full_name_accepts_two_or_more_words(#[case] raw: &str) {
    let name = FullName::new(raw).expect("valid name");
    assert_eq!(name.as_ref(), raw.trim());
}

#[rstest]
fn full_name_rejects_single_word() {
    assert_eq!(
        FullName::new("Jonas"),
        Err(UserValidationError::SingleWordName)
    );
}

#[rstest]
fn full_name_reports_every_failed_rule() {
    let errors = FullName::parse("A").expect_err("name is invalid");
    assert_eq!(
        errors,
        vec![
            UserValidationError::NameTooShort { min: NAME_MIN },
            UserValidationError::SingleWordName,
        ]
    );
}

#[rstest]
fn full_name_enforces_maximum_length() {
    let raw = format!("{} {}", "a".repeat(50), "b".repeat(50));
    assert_eq!(
        FullName::parse(&raw),
        Err(vec![UserValidationError::NameTooLong { max: NAME_MAX }])
    );

    let at_limit = format!("{} {}", "a".repeat(49), "b".repeat(50));
    assert!(FullName::new(at_limit).is_ok());
}

#[rstest]
fn full_name_rejects_blank_input() {
    assert_eq!(FullName::parse("   "), Err(vec![UserValidationError::EmptyName]));
}

#[rstest]
#[case("jonas@example.com")]
#[case("first.last+tag@mail.example.co.uk")]
#[case("o'brien@example.ie")]
#[case("user@sub-domain.example.technology")]
fn email_accepts_common_addresses(#[case] raw: &str) {
    assert!(EmailAddress::new(raw).is_ok(), "{raw} should be accepted");
}

#[rstest]
#[case("bad")]
#[case("jonas@")]
#[case("@example.com")]
#[case("jonas@localhost")]
#[case("jonas..doe@example.com")]
#[case(".jonas@example.com")]
#[case("jonas@-example.com")]
#[case("jonas example@example.com")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    assert_eq!(
        EmailAddress::new(raw),
        Err(UserValidationError::InvalidEmail),
        "{raw} should be rejected"
    );
}

#[rstest]
fn email_rejects_blank_and_overlong_values() {
    assert_eq!(EmailAddress::new("  "), Err(UserValidationError::EmptyEmail));
    let long = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    assert_eq!(
        EmailAddress::new(long),
        Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
    );
}

#[rstest]
fn email_is_trimmed() {
    let email = EmailAddress::new(" jonas@example.com ").expect("valid email");
    assert_eq!(email.as_ref(), "jonas@example.com");
}

#[rstest]
fn user_exposes_components() {
    let birth_date =
        BirthDate::from_date(NaiveDate::from_ymd_opt(1995, 1, 1).expect("valid date"));
    let user = User::new(
        UserId::new(VALID_ID).expect("valid id"),
        FullName::new("Jonas Jonaitis").expect("valid name"),
        EmailAddress::new("jonas@example.com").expect("valid email"),
        birth_date,
    );

    assert_eq!(user.id().to_string(), VALID_ID);
    assert_eq!(user.name().as_ref(), "Jonas Jonaitis");
    assert_eq!(user.email().as_ref(), "jonas@example.com");
    assert_eq!(user.birth_date(), birth_date);
}
