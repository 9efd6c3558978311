//! Sign-up form walkthrough
//!
//! Run with `RUST_LOG=fos_validator=debug` to see each pass.

use std::time::Duration;

use fos_dom::{dispatch_event, Document, EventType, InputType, ValidationConstraints};
use fos_validator::{ErrorPresenter, FormValidator, State, ValidatorOptions};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let form = doc.create_element("form");
    doc.append_child(doc.root(), form)?;

    let field = |doc: &mut Document, constraints: ValidationConstraints| -> anyhow::Result<_> {
        let wrap = doc.create_element("div");
        let input = doc.create_control("input", constraints);
        doc.append_child(form, wrap)?;
        doc.append_child(wrap, input)?;
        Ok(input)
    };
    let email = field(&mut doc, ValidationConstraints::required().with_type(InputType::Email))?;
    let password = field(&mut doc, ValidationConstraints::required().with_length(Some(8), None))?;
    let confirm = field(&mut doc, ValidationConstraints::required())?;

    doc.set_attribute(email, "data-value-missing", "Email is required")?;
    doc.set_attribute(email, "data-type-mismatch", "Not an email address")?;
    doc.set_attribute(password, "data-value-missing", "Pick a password")?;
    doc.set_attribute(password, "data-too-short", "At least 8 characters")?;
    doc.set_attribute(confirm, "data-value-missing", "Repeat the password")?;

    let doc = doc.into_shared();
    let validator = FormValidator::with_form_options(doc.clone(), form, ValidatorOptions::default())?;

    let passwords = doc.clone();
    validator.add_custom_validation(
        confirm,
        move || {
            let doc = passwords.borrow();
            doc.value(password) == doc.value(confirm)
        },
        Some("input"),
        "Passwords do not match",
        None,
    )?;

    let taken = doc.clone();
    validator.add_async_custom_validation(
        email,
        move || {
            let address = taken.borrow().value(email).unwrap_or_default().to_string();
            async move {
                smol::Timer::after(Duration::from_millis(50)).await;
                if address.starts_with("admin@") {
                    Err("taken".to_string())
                } else {
                    Ok(address)
                }
            }
        },
        |reason: &str| format!("Address {reason}"),
        |address: &str| println!("{address} is available"),
        None,
    )?;

    // Empty submit
    println!("submit: {}", validator.validate_form());
    report(&validator, &[email, password, confirm]);

    // Fill in, with mismatched confirmation
    {
        let mut doc = doc.borrow_mut();
        doc.set_value(email, "admin@example.org")?;
        doc.set_value(password, "correct horse")?;
        doc.set_value(confirm, "correct hose")?;
    }
    dispatch_event(&doc, confirm, EventType::Change);
    dispatch_event(&doc, confirm, EventType::Blur);
    println!("confirm after blur visited={}", validator.has_state(confirm, State::Visited));

    println!("submit: {}", validator.validate_form());
    smol::block_on(validator.settle());
    report(&validator, &[email, password, confirm]);

    // Fix everything
    {
        let mut doc = doc.borrow_mut();
        doc.set_value(email, "ada@example.org")?;
        doc.set_value(confirm, "correct horse")?;
    }
    println!("submit: {}", validator.validate_form());
    smol::block_on(validator.settle());
    report(&validator, &[email, password, confirm]);

    validator.remove_validations();
    Ok(())
}

fn report(validator: &FormValidator, fields: &[fos_validator::NodeId]) {
    let doc = validator.host().borrow();
    for &field in fields {
        match ErrorPresenter::message(&*doc, field) {
            Some(message) => println!("  {field}: {message}"),
            None => println!("  {field}: ok"),
        }
    }
}
