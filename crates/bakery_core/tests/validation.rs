use bakery_core::validation::{
    check_customer_age, check_customer_name, check_email, check_flavor, check_quantity,
    validate_customer, validate_login, validate_order, CustomerDraft, OrderDraft,
};
use bakery_core::OrderSize;

#[test]
fn email_accepts_one_or_two_tld_parts() {
    for email in ["a@b.com", "ana.silva@bakery.com.br", "ANA@BAKERY.COM", " a@b.com "] {
        assert!(check_email(email).is_valid(), "{email:?} should be accepted");
    }
}

#[test]
fn email_rejects_other_shapes() {
    for email in [
        "ana",
        "@bakery.com",
        "ana@.com",
        "ana@bakery",
        "ana_silva@bakery.com",
        "ana@bakery.com.br.pt",
        "ana@bakery-shop.com",
    ] {
        let validation = check_email(email);
        assert_eq!(validation.errors, vec!["Email is invalid".to_string()], "{email:?}");
    }
    assert_eq!(check_email("  ").errors, vec!["Email is empty".to_string()]);
}

#[test]
fn login_collects_email_and_password_messages() {
    let validation = validate_login("", "");
    assert!(!validation.is_valid());
    assert_eq!(validation.summary(), "Email is empty\nPassword is empty");
}

#[test]
fn customer_name_needs_two_words_and_four_characters() {
    assert!(check_customer_name("Ana Silva").is_valid());
    assert!(check_customer_name("Jo Li").is_valid());
    assert_eq!(
        check_customer_name("Ana").errors,
        vec![
            "Name is invalid".to_string(),
            "You must enter first and last name".to_string()
        ]
    );
    assert_eq!(
        check_customer_name("Josefina").errors,
        vec!["You must enter first and last name".to_string()]
    );
    assert_eq!(check_customer_name("A B").errors, vec!["Name is invalid".to_string()]);
}

#[test]
fn customer_age_is_one_or_two_digits() {
    assert!(check_customer_age("7").is_valid());
    assert!(check_customer_age("99").is_valid());
    for age in ["", "100", "3a", "-1", " "] {
        assert!(!check_customer_age(age).is_valid(), "{age:?}");
    }
}

#[test]
fn order_fields_must_be_present_and_numeric() {
    assert!(check_flavor("Chocolate").is_valid());
    assert!(!check_flavor("   ").is_valid());
    assert!(check_quantity("12").is_valid());
    for quantity in ["", "0", "two", "1.5"] {
        assert!(!check_quantity(quantity).is_valid(), "{quantity:?}");
    }
}

#[test]
fn valid_forms_yield_parsed_drafts() {
    assert_eq!(
        validate_customer(" Ana Silva ", "30"),
        Ok(CustomerDraft {
            name: "Ana Silva".to_string(),
            age: 30,
        })
    );
    assert_eq!(
        validate_order("Chocolate", " 2 ", OrderSize::Medium),
        Ok(OrderDraft {
            flavor: "Chocolate".to_string(),
            quantity: 2,
            size: OrderSize::Medium,
        })
    );
    let rejected = validate_order("", "", OrderSize::Small).unwrap_err();
    assert_eq!(rejected.errors.len(), 2);
}
