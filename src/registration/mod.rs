pub mod commands;
mod flow;

pub use flow::{
    RegistrationError, RegistrationFlow, RegistrationForm, RegistrationSnapshot,
    RegistrationStep, MIN_PASSWORD_LEN,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert_eq!(form().validate(), Ok(()));
    }

    #[test]
    fn missing_field_is_reported_first() {
        let incomplete = RegistrationForm {
            phone: String::new(),
            confirm_password: "other".into(),
            ..form()
        };
        assert_eq!(incomplete.validate(), Err(RegistrationError::MissingFields));
    }

    #[test]
    fn mismatch_before_length() {
        let mismatched = RegistrationForm {
            password: "abc".into(),
            confirm_password: "abd".into(),
            ..form()
        };
        assert_eq!(mismatched.validate(), Err(RegistrationError::PasswordMismatch));

        let short = RegistrationForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..form()
        };
        assert_eq!(short.validate(), Err(RegistrationError::PasswordTooShort));
    }

    #[test]
    fn messages_match_the_form() {
        assert_eq!(
            RegistrationError::MissingFields.to_string(),
            "All fields are required"
        );
        assert_eq!(
            RegistrationError::from(crate::identity::AuthError::EmailAlreadyInUse).to_string(),
            "This email is already registered. Please use a different email or login."
        );
        assert_eq!(
            RegistrationError::from(crate::identity::AuthError::Provider("x".into())),
            RegistrationError::Failed
        );
    }
}
