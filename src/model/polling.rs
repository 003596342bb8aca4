use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Opening hours shared by every polling place.
pub const POLLING_HOURS: &str = "7:00 AM - 8:00 PM";

/// The fixed set of sites a voter can be assigned to: `(name, street address)`.
pub const POLLING_SITES: [(&str, &str); 3] = [
    ("Community Center", "123 Main St"),
    ("City Hall", "456 Oak Ave"),
    ("Public Library", "789 Elm St"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingPlace {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub hours: String,
}

/// The address a voter wants a polling place for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuery {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl AddressQuery {
    /// Pick a polling place for this address.
    ///
    /// The choice is a pure function of `address`, `city` and `zipCode`; the
    /// returned place echoes the voter's city, state and zip code.
    pub fn resolve(&self) -> Result<PollingPlace, Error> {
        let field = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        let (address, city, state, zip_code) = match (
            field(&self.address),
            field(&self.city),
            field(&self.state),
            field(&self.zip_code),
        ) {
            (Some(address), Some(city), Some(state), Some(zip_code)) => {
                (address, city, state, zip_code)
            }
            _ => return Err(Error::Validation("Missing address information".to_string())),
        };

        let hash = address_hash(&format!("{address}{city}{zip_code}"));
        let slot = (i64::from(hash).unsigned_abs() % POLLING_SITES.len() as u64) as usize;
        let (name, site_address) = POLLING_SITES[slot];

        Ok(PollingPlace {
            name: name.to_string(),
            address: site_address.to_string(),
            city,
            state,
            zip_code,
            hours: POLLING_HOURS.to_string(),
        })
    }
}

/// 32-bit rolling hash `h = h * 31 + unit` over the UTF-16 code units of `key`,
/// wrapping at every step.
pub fn address_hash(key: &str) -> i32 {
    key.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(address: &str, city: &str, state: &str, zip_code: &str) -> AddressQuery {
        AddressQuery {
            address: Some(address.to_string()),
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            zip_code: Some(zip_code.to_string()),
        }
    }

    #[test]
    fn hash_values() {
        assert_eq!(address_hash(""), 0);
        assert_eq!(address_hash("abc"), 96354);
        assert_eq!(address_hash("1 StX00000"), -1982441560);
        assert_eq!(address_hash("742 Evergreen TerraceSpringfield49007"), 1920658961);
    }

    #[test]
    fn each_site_is_reachable() {
        let place = query("123 Main St", "Springfield", "IL", "62701").resolve().unwrap();
        assert_eq!(place.name, "Community Center");

        // Negative hash: the absolute value picks the slot.
        let place = query("1 St", "X", "Y", "00000").resolve().unwrap();
        assert_eq!(place.name, "City Hall");
        assert_eq!(place.address, "456 Oak Ave");

        let place = query("742 Evergreen Terrace", "Springfield", "OR", "49007")
            .resolve()
            .unwrap();
        assert_eq!(place.name, "Public Library");
        assert_eq!(place.city, "Springfield");
        assert_eq!(place.state, "OR");
        assert_eq!(place.zip_code, "49007");
        assert_eq!(place.hours, POLLING_HOURS);
    }

    #[test]
    fn state_does_not_affect_choice() {
        let a = query("1 St", "X", "Y", "00000").resolve().unwrap();
        let b = query("1 St", "X", "Z", "00000").resolve().unwrap();
        assert_eq!(a.name, b.name);
        assert_eq!(b.state, "Z");
    }

    #[test]
    fn all_fields_required() {
        let mut incomplete = query("1 St", "X", "Y", "00000");
        incomplete.state = None;
        assert!(matches!(incomplete.resolve(), Err(Error::Validation(_))));

        let mut blank = query("1 St", "X", "Y", "00000");
        blank.address = Some(String::new());
        assert!(matches!(blank.resolve(), Err(Error::Validation(_))));
    }
}
