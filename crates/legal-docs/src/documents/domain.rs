use chrono::Local;
use serde::{Deserialize, Serialize};

use super::derived;

/// The two agreement families the generator knows how to draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Tenancy,
    VehicleTransfer,
}

impl DocumentKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::Tenancy, Self::VehicleTransfer]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Tenancy => "tenancy",
            Self::VehicleTransfer => "vehicle-transfer",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tenancy => "Tenancy Agreement",
            Self::VehicleTransfer => "Vehicle Transfer Agreement",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Tenancy => "TENANCY AGREEMENT",
            Self::VehicleTransfer => "VEHICLE TRANSFER AGREEMENT",
        }
    }

    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Tenancy => "Tenancy_Agreement",
            Self::VehicleTransfer => "Vehicle_Transfer_Agreement",
        }
    }

    pub fn draft_key(self) -> String {
        format!("legal_doc_draft_{}", self.slug())
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LandlordTitle {
    #[default]
    Landlord,
    Landlady,
}

impl LandlordTitle {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Landlord => "Landlord",
            Self::Landlady => "Landlady",
        }
    }

    pub const fn signature_role(self) -> &'static str {
        match self {
            Self::Landlord => "LANDLORD",
            Self::Landlady => "LANDLADY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyType {
    #[default]
    #[serde(rename = "Single Room Self-Contained")]
    SingleRoom,
    #[serde(rename = "Chamber and Hall Self-Contained")]
    ChamberAndHall,
    #[serde(rename = "Two Bedroom Apartment")]
    TwoBedroom,
    #[serde(rename = "Three Bedroom House")]
    ThreeBedroom,
    #[serde(rename = "Commercial Store")]
    Store,
    #[serde(rename = "Other")]
    Other,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleRoom => "Single Room Self-Contained",
            Self::ChamberAndHall => "Chamber and Hall Self-Contained",
            Self::TwoBedroom => "Two Bedroom Apartment",
            Self::ThreeBedroom => "Three Bedroom House",
            Self::Store => "Commercial Store",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "Paid in Full")]
    PaidInFull,
    #[serde(rename = "Part Payment")]
    PartPayment,
    #[serde(rename = "Not Yet Paid")]
    NotYetPaid,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PaidInFull => "Paid in Full",
            Self::PartPayment => "Part Payment",
            Self::NotYetPaid => "Not Yet Paid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurationUnit {
    Months,
    #[default]
    Years,
}

impl DurationUnit {
    /// Lower-case unit noun, singular when the term is exactly one unit.
    pub const fn noun(self, value: u32) -> &'static str {
        match (self, value) {
            (Self::Months, 1) => "month",
            (Self::Months, _) => "months",
            (Self::Years, 1) => "year",
            (Self::Years, _) => "years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RentFrequency {
    Month,
    #[default]
    Year,
}

impl RentFrequency {
    pub const fn adjective(self) -> &'static str {
        match self {
            Self::Month => "monthly",
            Self::Year => "yearly",
        }
    }
}

/// Borrowed view of one signing witness. Either field may be empty or the literal `N/A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Witness<'r> {
    pub name: &'r str,
    pub phone: &'r str,
}

impl<'r> Witness<'r> {
    pub fn new(name: &'r str, phone: &'r str) -> Self {
        Self { name, phone }
    }
}

/// Form data for a residential or commercial tenancy agreement.
///
/// Dates are kept as the ISO strings the form produced (possibly empty); the
/// formatting layer decides how to present malformed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenancyRecord {
    pub date_of_agreement: String,
    pub landlord_title: LandlordTitle,
    pub landlord_name: String,
    pub landlord_phone: String,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub property_location: String,
    pub property_type: PropertyType,
    pub property_details: String,
    pub start_date: String,
    pub duration_value: u32,
    pub duration_unit: DurationUnit,
    pub rent_amount: f64,
    pub rent_frequency: RentFrequency,
    pub caution_fee: f64,
    pub payment_status: PaymentStatus,
    pub payment_note: String,
    pub witness1_name: String,
    pub witness1_phone: String,
    pub witness2_name: String,
    pub witness2_phone: String,
    pub include_phone_numbers: bool,
    pub custom_clauses: Vec<String>,
}

impl Default for TenancyRecord {
    fn default() -> Self {
        let today = today_iso();
        Self {
            date_of_agreement: today.clone(),
            landlord_title: LandlordTitle::default(),
            landlord_name: String::new(),
            landlord_phone: String::new(),
            tenant_name: String::new(),
            tenant_phone: String::new(),
            property_location: String::new(),
            property_type: PropertyType::default(),
            property_details: String::new(),
            start_date: today,
            duration_value: 1,
            duration_unit: DurationUnit::Years,
            rent_amount: 0.0,
            rent_frequency: RentFrequency::Year,
            caution_fee: 0.0,
            payment_status: PaymentStatus::default(),
            payment_note: String::new(),
            witness1_name: String::new(),
            witness1_phone: String::new(),
            witness2_name: String::new(),
            witness2_phone: String::new(),
            include_phone_numbers: true,
            custom_clauses: Vec::new(),
        }
    }
}

impl TenancyRecord {
    pub fn total_rent(&self) -> f64 {
        derived::total_rent(self)
    }

    pub fn witnesses(&self) -> [Witness<'_>; 2] {
        [
            Witness::new(&self.witness1_name, &self.witness1_phone),
            Witness::new(&self.witness2_name, &self.witness2_phone),
        ]
    }
}

/// Form data for a private vehicle sale between two individuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleTransferRecord {
    pub date_of_agreement: String,
    pub seller_name: String,
    pub seller_location: String,
    pub seller_phone: String,
    pub buyer_name: String,
    pub buyer_location: String,
    pub buyer_phone: String,
    pub vehicle_color: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub registration_number: String,
    pub total_price: f64,
    pub amount_paid: f64,
    pub payment_deadline: String,
    pub include_phone_numbers: bool,
    pub witness1_name: String,
    pub witness1_phone: String,
    pub witness2_name: String,
    pub witness2_phone: String,
}

impl Default for VehicleTransferRecord {
    fn default() -> Self {
        Self {
            date_of_agreement: today_iso(),
            seller_name: String::new(),
            seller_location: String::new(),
            seller_phone: String::new(),
            buyer_name: String::new(),
            buyer_location: String::new(),
            buyer_phone: String::new(),
            vehicle_color: String::new(),
            vehicle_make: String::new(),
            vehicle_model: String::new(),
            registration_number: String::new(),
            total_price: 0.0,
            amount_paid: 0.0,
            payment_deadline: String::new(),
            include_phone_numbers: true,
            witness1_name: String::new(),
            witness1_phone: String::new(),
            witness2_name: String::new(),
            witness2_phone: String::new(),
        }
    }
}

impl VehicleTransferRecord {
    /// Always recomputed from price and payment; a persisted balance is never consulted.
    pub fn outstanding_balance(&self) -> f64 {
        derived::outstanding_balance(self.total_price, self.amount_paid)
    }

    pub fn witnesses(&self) -> [Witness<'_>; 2] {
        [
            Witness::new(&self.witness1_name, &self.witness1_phone),
            Witness::new(&self.witness2_name, &self.witness2_phone),
        ]
    }
}

/// Either agreement record, tagged so drafts and API payloads are self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum AgreementRecord {
    Tenancy(TenancyRecord),
    VehicleTransfer(VehicleTransferRecord),
}

impl AgreementRecord {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Tenancy(_) => DocumentKind::Tenancy,
            Self::VehicleTransfer(_) => DocumentKind::VehicleTransfer,
        }
    }

    /// Name used in the export filename: the tenant or the buyer.
    pub fn primary_party(&self) -> &str {
        match self {
            Self::Tenancy(record) => &record.tenant_name,
            Self::VehicleTransfer(record) => &record.buyer_name,
        }
    }

    pub fn blank(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Tenancy => Self::Tenancy(TenancyRecord::default()),
            DocumentKind::VehicleTransfer => Self::VehicleTransfer(VehicleTransferRecord::default()),
        }
    }

    /// Parses an untagged record body for a known kind, as posted by the form.
    pub fn from_json_value(
        kind: DocumentKind,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            DocumentKind::Tenancy => Self::Tenancy(serde_json::from_value(value)?),
            DocumentKind::VehicleTransfer => Self::VehicleTransfer(serde_json::from_value(value)?),
        })
    }

    /// The record body without its tag; inverse of [`Self::from_json_value`].
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Tenancy(record) => serde_json::to_value(record),
            Self::VehicleTransfer(record) => serde_json::to_value(record),
        }
    }
}

fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
