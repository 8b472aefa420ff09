//! Invoice form schema and validator.
//!
//! A schema names the fields it accepts and the rule attached to each. The
//! full schema covers every invoice column; the create and update variants
//! omit `id` and `date` because the server generates or preserves those.
//!
//! Validation is fail-soft: it returns typed data or a field-keyed map of
//! messages, never a panic and never an infrastructure error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoicedesk_core::{CustomerId, FormData};

use crate::invoice::{InvoiceChanges, InvoiceStatus, MAX_AMOUNT, NewInvoice, to_cents};

pub const CUSTOMER_MESSAGE: &str = "Please select a customer";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than 0";
pub const AMOUNT_TYPE_MESSAGE: &str = "Expected number, received nan";
pub const AMOUNT_RANGE_MESSAGE: &str = "Amount is too large";
pub const STATUS_MESSAGE: &str = "Please select invoice status";
pub const REQUIRED_MESSAGE: &str = "Required";

/// An invoice form field, keyed in camelCase as the client submits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    CustomerId,
    Amount,
    Status,
    Date,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Id,
        Field::CustomerId,
        Field::Amount,
        Field::Status,
        Field::Date,
    ];

    /// Form key of this field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::CustomerId => "customerId",
            Field::Amount => "amount",
            Field::Status => "status",
            Field::Date => "date",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Violation messages per field, in rule order. Only failing fields appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Typed result of a successful validation.
///
/// `id` and `date` are only populated by schemas that include those fields.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub id: Option<String>,
    pub customer_id: CustomerId,
    /// Decimal currency amount as entered, strictly greater than zero.
    pub amount: f64,
    pub status: InvoiceStatus,
    pub date: Option<String>,
}

impl InvoiceForm {
    pub fn amount_in_cents(&self) -> i64 {
        to_cents(self.amount)
    }

    /// Row values for an insert dated `date`.
    pub fn into_new_invoice(self, date: NaiveDate) -> NewInvoice {
        NewInvoice {
            amount: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
            date,
        }
    }

    pub fn into_changes(self) -> InvoiceChanges {
        InvoiceChanges {
            amount: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
        }
    }
}

/// Declared shape of an invoice form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceSchema {
    omitted: &'static [Field],
}

/// Every invoice field.
pub static INVOICE_FORM: InvoiceSchema = InvoiceSchema::full();
/// Fields accepted by the create action.
pub static CREATE_INVOICE: InvoiceSchema = InvoiceSchema::omitting(&[Field::Id, Field::Date]);
/// Fields accepted by the update action.
pub static UPDATE_INVOICE: InvoiceSchema = InvoiceSchema::omitting(&[Field::Id, Field::Date]);

impl InvoiceSchema {
    pub const fn full() -> Self {
        Self { omitted: &[] }
    }

    /// The full schema minus `fields`.
    pub const fn omitting(fields: &'static [Field]) -> Self {
        Self { omitted: fields }
    }

    pub fn includes(&self, field: Field) -> bool {
        !self.omitted.contains(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.includes(*f))
    }

    /// Validate a raw submission. Keys outside the schema are ignored.
    pub fn validate(&self, form: &FormData) -> Result<InvoiceForm, FieldErrors> {
        let mut errors = FieldErrors::default();

        let id = self.required_string(Field::Id, form, &mut errors);

        let customer_id = match form.get(Field::CustomerId.key()).map(CustomerId::parse) {
            Some(Ok(id)) => Some(id),
            _ => {
                errors.push(Field::CustomerId, CUSTOMER_MESSAGE);
                None
            }
        };

        let amount = match coerce_number(form.get(Field::Amount.key())) {
            Some(value) if value > MAX_AMOUNT => {
                errors.push(Field::Amount, AMOUNT_RANGE_MESSAGE);
                None
            }
            Some(value) if value > 0.0 => Some(value),
            Some(_) => {
                errors.push(Field::Amount, AMOUNT_MESSAGE);
                None
            }
            None => {
                errors.push(Field::Amount, AMOUNT_TYPE_MESSAGE);
                None
            }
        };

        let status = match form.get(Field::Status.key()).map(str::parse::<InvoiceStatus>) {
            Some(Ok(status)) => Some(status),
            _ => {
                errors.push(Field::Status, STATUS_MESSAGE);
                None
            }
        };

        let date = self.required_string(Field::Date, form, &mut errors);

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) if errors.is_empty() => {
                Ok(InvoiceForm {
                    id,
                    customer_id,
                    amount,
                    status,
                    date,
                })
            }
            _ => Err(errors),
        }
    }

    fn required_string(
        &self,
        field: Field,
        form: &FormData,
        errors: &mut FieldErrors,
    ) -> Option<String> {
        if !self.includes(field) {
            return None;
        }
        match form.get(field.key()) {
            Some(value) => Some(value.to_string()),
            None => {
                errors.push(field, REQUIRED_MESSAGE);
                None
            }
        }
    }
}

/// Numeric coercion of a form value.
///
/// Blank or missing input coerces to zero. Anything that is not a finite
/// decimal number yields `None`.
fn coerce_number(raw: Option<&str>) -> Option<f64> {
    let text = raw.unwrap_or_default().trim();
    if text.is_empty() {
        return Some(0.0);
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().copied().collect()
    }

    fn valid_form() -> FormData {
        form(&[("customerId", "c1"), ("amount", "10.50"), ("status", "pending")])
    }

    fn error_fields(errors: &FieldErrors) -> Vec<Field> {
        errors.fields().collect()
    }

    #[test]
    fn create_schema_accepts_valid_submission() {
        let parsed = CREATE_INVOICE.validate(&valid_form()).unwrap();
        assert_eq!(parsed.customer_id.as_str(), "c1");
        assert_eq!(parsed.amount, 10.5);
        assert_eq!(parsed.amount_in_cents(), 1050);
        assert_eq!(parsed.status, InvoiceStatus::Pending);
        assert_eq!(parsed.id, None);
        assert_eq!(parsed.date, None);
    }

    #[test]
    fn create_and_update_omit_id_and_date() {
        for schema in [&CREATE_INVOICE, &UPDATE_INVOICE] {
            let fields: Vec<Field> = schema.fields().collect();
            assert_eq!(fields, vec![Field::CustomerId, Field::Amount, Field::Status]);
        }
        assert_eq!(INVOICE_FORM.fields().count(), 5);
    }

    #[test]
    fn full_schema_requires_id_and_date() {
        let errors = INVOICE_FORM.validate(&valid_form()).unwrap_err();
        assert_eq!(error_fields(&errors), vec![Field::Id, Field::Date]);
        assert_eq!(errors.get(Field::Date).unwrap(), [REQUIRED_MESSAGE.to_string()]);

        let mut complete = valid_form();
        complete.insert("id", "inv-1");
        complete.insert("date", "2024-01-01");
        let parsed = INVOICE_FORM.validate(&complete).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("inv-1"));
        assert_eq!(parsed.date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn missing_customer_is_reported_on_that_field_only() {
        let errors = CREATE_INVOICE
            .validate(&form(&[("amount", "5"), ("status", "paid")]))
            .unwrap_err();
        assert_eq!(error_fields(&errors), vec![Field::CustomerId]);
        assert_eq!(errors.get(Field::CustomerId).unwrap(), [CUSTOMER_MESSAGE.to_string()]);
    }

    #[test]
    fn empty_customer_is_rejected() {
        let errors = CREATE_INVOICE
            .validate(&form(&[("customerId", ""), ("amount", "5"), ("status", "paid")]))
            .unwrap_err();
        assert_eq!(error_fields(&errors), vec![Field::CustomerId]);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in ["0", "-5", "", "   ", "0.00"] {
            let errors = CREATE_INVOICE
                .validate(&form(&[("customerId", "c1"), ("amount", amount), ("status", "paid")]))
                .unwrap_err();
            assert_eq!(error_fields(&errors), vec![Field::Amount], "amount {amount:?}");
            assert_eq!(errors.get(Field::Amount).unwrap(), [AMOUNT_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn amounts_beyond_the_limit_are_rejected() {
        for amount in ["1e300", "90000000000000.5", "9223372036854775807"] {
            let errors = CREATE_INVOICE
                .validate(&form(&[("customerId", "c1"), ("amount", amount), ("status", "paid")]))
                .unwrap_err();
            assert_eq!(error_fields(&errors), vec![Field::Amount], "amount {amount:?}");
            assert_eq!(errors.get(Field::Amount).unwrap(), [AMOUNT_RANGE_MESSAGE.to_string()]);
        }

        let parsed = CREATE_INVOICE
            .validate(&form(&[("customerId", "c1"), ("amount", "90000000000000"), ("status", "paid")]))
            .unwrap();
        assert_eq!(parsed.amount_in_cents(), 9_000_000_000_000_000);
    }

    #[test]
    fn missing_amount_coerces_to_zero() {
        let errors = CREATE_INVOICE
            .validate(&form(&[("customerId", "c1"), ("status", "paid")]))
            .unwrap_err();
        assert_eq!(errors.get(Field::Amount).unwrap(), [AMOUNT_MESSAGE.to_string()]);
    }

    #[test]
    fn non_numeric_amount_is_a_type_error() {
        for amount in ["abc", "12abc", "NaN", "inf", "1,000"] {
            let errors = CREATE_INVOICE
                .validate(&form(&[("customerId", "c1"), ("amount", amount), ("status", "paid")]))
                .unwrap_err();
            assert_eq!(error_fields(&errors), vec![Field::Amount], "amount {amount:?}");
            assert_eq!(errors.get(Field::Amount).unwrap(), [AMOUNT_TYPE_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn amount_coercion_trims_whitespace() {
        let parsed = CREATE_INVOICE
            .validate(&form(&[("customerId", "c1"), ("amount", " 0.01 "), ("status", "paid")]))
            .unwrap();
        assert_eq!(parsed.amount_in_cents(), 1);
    }

    #[test]
    fn invalid_status_is_rejected() {
        for status in ["", "Pending", "void", "paid "] {
            let errors = CREATE_INVOICE
                .validate(&form(&[("customerId", "c1"), ("amount", "1"), ("status", status)]))
                .unwrap_err();
            assert_eq!(error_fields(&errors), vec![Field::Status], "status {status:?}");
            assert_eq!(errors.get(Field::Status).unwrap(), [STATUS_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn empty_submission_reports_every_accepted_field() {
        let errors = UPDATE_INVOICE.validate(&FormData::new()).unwrap_err();
        assert_eq!(
            error_fields(&errors),
            vec![Field::CustomerId, Field::Amount, Field::Status]
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut submission = valid_form();
        submission.insert("id", "attacker-chosen");
        submission.insert("date", "1999-01-01");
        let parsed = UPDATE_INVOICE.validate(&submission).unwrap();
        assert_eq!(parsed.id, None);
        assert_eq!(parsed.date, None);
    }

    #[test]
    fn field_errors_serialize_with_form_keys() {
        let mut errors = FieldErrors::default();
        errors.push(Field::CustomerId, CUSTOMER_MESSAGE);
        errors.push(Field::Amount, AMOUNT_MESSAGE);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["customerId"][0], CUSTOMER_MESSAGE);
        assert_eq!(json["amount"][0], AMOUNT_MESSAGE);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: validation never panics, and every reported field belongs to the schema.
        #[test]
        fn validation_only_reports_schema_fields(
            customer in proptest::option::of(".{0,8}"),
            amount in proptest::option::of(".{0,8}"),
            status in proptest::option::of(".{0,8}"),
        ) {
            let mut submission = FormData::new();
            if let Some(v) = customer { submission.insert("customerId", v); }
            if let Some(v) = amount { submission.insert("amount", v); }
            if let Some(v) = status { submission.insert("status", v); }

            if let Err(errors) = CREATE_INVOICE.validate(&submission) {
                prop_assert!(!errors.is_empty());
                for field in errors.fields() {
                    prop_assert!(CREATE_INVOICE.includes(field));
                }
            }
        }

        /// Property: any accepted amount is strictly positive.
        #[test]
        fn accepted_amounts_are_positive(amount in -1_000_000.0f64..1_000_000.0f64) {
            let submission = form(&[
                ("customerId", "c1"),
                ("amount", &amount.to_string()),
                ("status", "pending"),
            ]);
            match CREATE_INVOICE.validate(&submission) {
                Ok(parsed) => prop_assert!(parsed.amount > 0.0),
                Err(errors) => {
                    prop_assert!(amount <= 0.0);
                    prop_assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Amount]);
                }
            }
        }
    }
}
