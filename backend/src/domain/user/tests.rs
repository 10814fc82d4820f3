//! Tests for the domain user model.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};

#[fixture]
fn alice() -> User {
    User {
        id: UserId::random(),
        name: PersonName::new("Alice Example").expect("valid name"),
        username: Username::new("alice").expect("valid username"),
        email: EmailAddress::new("alice@example.com").expect("valid email"),
        profile: Profile::default(),
        connections: Vec::new(),
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
#[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
#[case("a_really_long_username_over_30c", UserValidationError::UsernameTooLong { max: USERNAME_MAX })]
#[case("bad name", UserValidationError::UsernameInvalidCharacters)]
#[case("émile", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
#[case("bob", "bob")]
#[case("  carol.d-e_f ", "carol.d-e_f")]
fn username_trims_valid_input(#[case] raw: &str, #[case] expected: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), expected);
}

#[rstest]
#[case("  Alice@Example.COM ", "alice@example.com")]
#[case("x@y", "x@y")]
fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("two@@example.com", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("alice@", UserValidationError::InvalidEmail)]
#[case("al ice@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
fn email_length_matches_the_column_width() {
    let local = "a".repeat(EMAIL_MAX - "@example.com".len());
    let longest = format!("{local}@example.com");
    assert!(EmailAddress::new(&longest).is_ok());

    let error = EmailAddress::new(format!("a{longest}")).expect_err("one character too many");
    assert_eq!(
        error,
        UserValidationError::FieldTooLong {
            field: "email",
            max: EMAIL_MAX
        }
    );
    assert_eq!(error.field(), "email");
}

#[rstest]
fn person_name_enforces_bounds() {
    assert_eq!(PersonName::new(" "), Err(UserValidationError::EmptyName));
    assert_eq!(
        PersonName::new("n".repeat(NAME_MAX + 1)),
        Err(UserValidationError::NameTooLong { max: NAME_MAX })
    );
    let name = PersonName::new("  Ada Lovelace  ").expect("valid name");
    assert_eq!(name.as_ref(), "Ada Lovelace");
}

#[rstest]
fn validation_errors_name_their_field() {
    assert_eq!(UserValidationError::InvalidEmail.field(), "email");
    assert_eq!(UserValidationError::UsernameInvalidCharacters.field(), "username");
    assert_eq!(
        UserValidationError::FieldTooLong {
            field: "headline",
            max: SHORT_FIELD_MAX
        }
        .field(),
        "headline"
    );
}

#[rstest]
fn default_profile_uses_house_headline() {
    let profile = Profile::default();
    assert_eq!(profile.headline, DEFAULT_HEADLINE);
    assert!(profile.skills.is_empty());
}

#[rstest]
fn feed_authors_include_self_first_and_skip_self_connections(mut alice: User) {
    let bob = UserId::random();
    alice.connections = vec![bob, alice.id];

    assert_eq!(alice.feed_authors(), vec![alice.id, bob]);
}

#[rstest]
fn summary_projects_public_fields(alice: User) {
    let summary = alice.summary();
    assert_eq!(summary.id, alice.id);
    assert_eq!(summary.username, "alice");
    assert_eq!(summary.headline, DEFAULT_HEADLINE);
    assert!(summary.profile_picture.is_none());
}

#[rstest]
fn profile_update_applies_only_supplied_fields(mut alice: User) {
    let update = ProfileUpdate::try_from(ProfileDraft {
        headline: Some("  Rustacean ".to_owned()),
        skills: Some(vec!["Rust".to_owned(), "  ".to_owned(), " SQL ".to_owned()]),
        ..ProfileDraft::default()
    })
    .expect("valid update");

    update.apply_to(&mut alice);

    assert_eq!(alice.profile.headline, "Rustacean");
    assert_eq!(alice.profile.skills, vec!["Rust".to_owned(), "SQL".to_owned()]);
    assert_eq!(alice.name.as_ref(), "Alice Example");
    assert!(alice.profile.about.is_none());
}

#[rstest]
fn profile_update_rejects_blank_name() {
    let result = ProfileUpdate::try_from(ProfileDraft {
        name: Some("   ".to_owned()),
        ..ProfileDraft::default()
    });
    assert_eq!(result, Err(UserValidationError::EmptyName));
}

#[rstest]
fn profile_update_rejects_oversized_about() {
    let result = ProfileUpdate::try_from(ProfileDraft {
        about: Some("a".repeat(ABOUT_MAX + 1)),
        ..ProfileDraft::default()
    });
    assert_eq!(
        result,
        Err(UserValidationError::FieldTooLong {
            field: "about",
            max: ABOUT_MAX
        })
    );
}

#[rstest]
fn profile_update_rejects_incomplete_experience() {
    let entry = ExperienceEntry {
        title: "Engineer".to_owned(),
        company: " ".to_owned(),
        start_date: NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"),
        end_date: None,
        description: String::new(),
        currently_working: true,
    };
    let result = ProfileUpdate::try_from(ProfileDraft {
        experience: Some(vec![entry]),
        ..ProfileDraft::default()
    });
    assert_eq!(
        result,
        Err(UserValidationError::EmptyField {
            field: "experience"
        })
    );
}

#[rstest]
fn experience_entries_accept_camel_case_json() {
    let entry: ExperienceEntry = serde_json::from_value(serde_json::json!({
        "title": "Engineer",
        "company": "Acme",
        "startDate": "2021-04-01",
        "currentlyWorking": true,
        "_id": "client-side-key",
    }))
    .expect("entry decodes");

    assert_eq!(entry.end_date, None);
    assert!(entry.currently_working);
    assert_eq!(entry.description, "");
}
