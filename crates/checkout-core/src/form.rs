//! Billing Form
//!
//! Non-sensitive billing fields held by the page. Card number, expiry and CVC
//! are entered into vault-hosted secure fields and never appear here, except
//! for the demo inputs that only illustrate formatting.

use serde::{Deserialize, Serialize};

use crate::format::{format_card_number, format_expiry_date};
use crate::wire::BillingAddress;

/// Supported billing countries
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[default]
    US,
    CA,
}

impl Country {
    pub const ALL: [Self; 2] = [Self::US, Self::CA];

    pub const fn code(self) -> &'static str {
        match self {
            Self::US => "US",
            Self::CA => "CA",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::US => "United States",
            Self::CA => "Canada",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "US" => Some(Self::US),
            "CA" => Some(Self::CA),
            _ => None,
        }
    }
}

/// US region codes offered when the country is US
pub const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

pub fn is_us_state(code: &str) -> bool {
    US_STATES.iter().any(|(c, _)| *c == code)
}

/// Editable form fields, named as the form inputs are
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    CardholderName,
    AddressLine1,
    AddressLine2,
    City,
    State,
    PostalCode,
    Country,
    CardNumber,
    ExpiryDate,
}

impl FormField {
    /// Fields that must be non-blank before a card submission
    pub const REQUIRED: [Self; 6] = [
        Self::CardholderName,
        Self::AddressLine1,
        Self::City,
        Self::State,
        Self::PostalCode,
        Self::Country,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::CardholderName => "cardholderName",
            Self::AddressLine1 => "addressLine1",
            Self::AddressLine2 => "addressLine2",
            Self::City => "city",
            Self::State => "state",
            Self::PostalCode => "postalCode",
            Self::Country => "country",
            Self::CardNumber => "cardNumber",
            Self::ExpiryDate => "expiryDate",
        }
    }

    /// Placeholder text, also used when listing missing fields
    pub const fn label(self) -> &'static str {
        match self {
            Self::CardholderName => "Cardholder Name",
            Self::AddressLine1 => "Address Line 1",
            Self::AddressLine2 => "Address Line 2 (Optional)",
            Self::City => "City",
            Self::State => "State",
            Self::PostalCode => "Postal Code",
            Self::Country => "Country",
            Self::CardNumber => "Card Number",
            Self::ExpiryDate => "MM/YY",
        }
    }
}

/// Current values of the billing form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingFormValues {
    pub cardholder_name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Country,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
}

impl BillingFormValues {
    /// Prefilled values for the sandbox demo
    pub fn demo() -> Self {
        Self {
            cardholder_name: "John Cena".into(),
            address_line1: "185 Berry St".into(),
            address_line2: String::new(),
            city: "San Francisco".into(),
            state: "CA".into(),
            postal_code: "94107".into(),
            country: Country::US,
            card_number: String::new(),
            expiry_date: String::new(),
        }
    }

    /// Current text of a field
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::CardholderName => &self.cardholder_name,
            FormField::AddressLine1 => &self.address_line1,
            FormField::AddressLine2 => &self.address_line2,
            FormField::City => &self.city,
            FormField::State => &self.state,
            FormField::PostalCode => &self.postal_code,
            FormField::Country => self.country.code(),
            FormField::CardNumber => &self.card_number,
            FormField::ExpiryDate => &self.expiry_date,
        }
    }

    /// Return the values with exactly `field` updated from raw input.
    pub fn with_field(mut self, field: FormField, raw: &str) -> Self {
        match field {
            FormField::CardholderName => self.cardholder_name = raw.to_string(),
            FormField::AddressLine1 => self.address_line1 = raw.to_string(),
            FormField::AddressLine2 => self.address_line2 = raw.to_string(),
            FormField::City => self.city = raw.to_string(),
            FormField::PostalCode => self.postal_code = raw.to_string(),
            FormField::CardNumber => self.card_number = format_card_number(raw),
            FormField::ExpiryDate => self.expiry_date = format_expiry_date(raw),
            FormField::State => {
                if self.country != Country::US || is_us_state(raw) {
                    self.state = raw.to_string();
                }
            }
            FormField::Country => {
                if let Some(country) = Country::from_code(raw) {
                    self.country = country;
                    if country == Country::US && !is_us_state(&self.state) {
                        self.state.clear();
                    }
                }
            }
        }
        self
    }

    /// Required fields that are still blank
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::REQUIRED
            .into_iter()
            .filter(|f| self.value(*f).trim().is_empty())
            .collect()
    }

    pub fn billing_address(&self) -> BillingAddress {
        BillingAddress {
            address_1: self.address_line1.clone(),
            address_2: self.address_line2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.code().to_string(),
        }
    }
}
