//! Step validation error types.
//!
//! These errors block advancement from a wizard step until the patient
//! corrects the offending field. They are always recoverable; the wizard
//! stays on the current step and re-renders the message.

use thiserror::Error;

/// Errors raised when validating a step's required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("Por favor, preencha o campo: {0}.")]
    MissingField(&'static str),

    /// The e-mail does not look like an address.
    #[error("E-mail inválido. Verifique o endereço informado.")]
    InvalidEmail,

    /// Day/month/year do not form a calendar date.
    #[error("Data inválida. Verifique dia/mês/ano.")]
    InvalidDate,

    /// The birth date lies after the reference date.
    #[error("Data de nascimento no futuro não é válida.")]
    FutureBirthDate,
}

impl ValidationError {
    /// The field the patient has to correct, for inline display.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidEmail => "email",
            ValidationError::InvalidDate | ValidationError::FutureBirthDate => {
                "data de nascimento"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_user_facing() {
        assert_eq!(
            ValidationError::MissingField("nome completo").to_string(),
            "Por favor, preencha o campo: nome completo."
        );
        assert_eq!(
            ValidationError::FutureBirthDate.to_string(),
            "Data de nascimento no futuro não é válida."
        );
    }

    #[test]
    fn field_points_at_offending_input() {
        assert_eq!(ValidationError::InvalidDate.field(), "data de nascimento");
        assert_eq!(ValidationError::MissingField("email").field(), "email");
    }
}
