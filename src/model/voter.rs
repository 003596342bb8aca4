use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{polling::PollingPlace, random_base36, timestamp};

/// Registration state of a voter. Admins may move a voter between any two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoterStatus {
    Pending,
    Active,
    Inactive,
    Rejected,
}

impl VoterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Rejected => "rejected",
        }
    }
}

impl Display for VoterStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoterStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "rejected" => Ok(Self::Rejected),
            _ => Err(Error::Validation("Invalid status".to_string())),
        }
    }
}

/// A single registrant, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    pub voter_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Last four digits only.
    pub ssn: Option<String>,
    pub status: VoterStatus,
    #[serde(with = "timestamp")]
    pub registered_date: DateTime<Utc>,
    #[serde(default)]
    pub polling_place: Option<PollingPlace>,
}

/// Generate a fresh voter ID: `V`, the epoch milliseconds, then five random
/// uppercase base-36 characters. Uniqueness is not checked.
pub fn generate_voter_id(now: DateTime<Utc>) -> String {
    format!(
        "V{}{}",
        now.timestamp_millis(),
        random_base36(5).to_uppercase()
    )
}

/// Reduce an SSN to the last four characters once hyphens are removed.
pub fn ssn_suffix(ssn: &str) -> String {
    let digits: Vec<char> = ssn.chars().filter(|c| *c != '-').collect();
    let start = digits.len().saturating_sub(4);
    digits[start..].iter().collect()
}

/// Treat empty strings like missing fields.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// The body of a registration request. Every field is optional at the parsing
/// stage so that missing fields are reported as a validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub ssn: Option<String>,
}

impl Registration {
    /// The normalised SSN suffix, if an SSN was supplied.
    pub fn ssn_suffix(&self) -> Option<String> {
        present(&self.ssn).map(ssn_suffix)
    }

    /// Check the required fields and build a pending record.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<VoterRecord, Error> {
        let ssn = self.ssn_suffix();
        let phone = present(&self.phone).map(str::to_string);
        match self {
            Self {
                first_name: Some(first_name),
                last_name: Some(last_name),
                email: Some(email),
                date_of_birth: Some(date_of_birth),
                address: Some(address),
                city: Some(city),
                state: Some(state),
                zip_code: Some(zip_code),
                ..
            } if [
                &first_name,
                &last_name,
                &email,
                &date_of_birth,
                &address,
                &city,
                &state,
                &zip_code,
            ]
            .iter()
            .all(|field| !field.is_empty()) =>
            {
                Ok(VoterRecord {
                    voter_id: generate_voter_id(now),
                    first_name,
                    last_name,
                    email,
                    phone,
                    date_of_birth,
                    address,
                    city,
                    state,
                    zip_code,
                    ssn,
                    status: VoterStatus::Pending,
                    registered_date: now,
                    polling_place: None,
                })
            }
            _ => Err(Error::Validation("Missing required fields".to_string())),
        }
    }
}

/// The body of a status lookup: any one of the three keys identifies a voter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLookup {
    pub voter_id: Option<String>,
    pub email: Option<String>,
    pub ssn: Option<String>,
}

impl StatusLookup {
    /// Fails if no key was supplied at all.
    pub fn validate(&self) -> Result<(), Error> {
        if present(&self.voter_id).is_none()
            && present(&self.email).is_none()
            && present(&self.ssn).is_none()
        {
            return Err(Error::Validation(
                "Please provide voter ID, email, or SSN".to_string(),
            ));
        }
        Ok(())
    }

    /// Does the record match any of the supplied keys?
    /// A full SSN is reduced to its suffix before comparison.
    pub fn matches(&self, voter: &VoterRecord) -> bool {
        let by_id = present(&self.voter_id).map_or(false, |id| voter.voter_id == id);
        let by_email = present(&self.email).map_or(false, |email| voter.email == email);
        let by_ssn = present(&self.ssn)
            .map(ssn_suffix)
            .map_or(false, |suffix| voter.ssn.as_deref() == Some(suffix.as_str()));
        by_id || by_email || by_ssn
    }
}

/// What a voter may see about their own registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub voter_id: String,
    pub status: VoterStatus,
    #[serde(with = "timestamp")]
    pub registered_date: DateTime<Utc>,
    pub polling_place: Option<PollingPlace>,
}

impl From<&VoterRecord> for StatusView {
    fn from(voter: &VoterRecord) -> Self {
        Self {
            voter_id: voter.voter_id.clone(),
            status: voter.status,
            registered_date: voter.registered_date,
            polling_place: voter.polling_place.clone(),
        }
    }
}

/// Returned after a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub voter_id: String,
    pub status: VoterStatus,
}

/// A voter as listed to admins: everything except the SSN suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterSummary {
    pub voter_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub status: VoterStatus,
    #[serde(with = "timestamp")]
    pub registered_date: DateTime<Utc>,
    pub polling_place: Option<PollingPlace>,
}

impl From<&VoterRecord> for VoterSummary {
    fn from(voter: &VoterRecord) -> Self {
        Self {
            voter_id: voter.voter_id.clone(),
            first_name: voter.first_name.clone(),
            last_name: voter.last_name.clone(),
            email: voter.email.clone(),
            phone: voter.phone.clone(),
            date_of_birth: voter.date_of_birth.clone(),
            address: voter.address.clone(),
            city: voter.city.clone(),
            state: voter.state.clone(),
            zip_code: voter.zip_code.clone(),
            status: voter.status,
            registered_date: voter.registered_date,
            polling_place: voter.polling_place.clone(),
        }
    }
}

/// The body of an admin status update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

impl StatusUpdate {
    pub fn parse(&self) -> Result<VoterStatus, Error> {
        self.status
            .as_deref()
            .unwrap_or_default()
            .parse::<VoterStatus>()
    }
}
