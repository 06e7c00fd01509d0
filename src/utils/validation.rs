use crate::models::{Address, Geo, NewUser, User, UserInput, UserPatch};
use regex::Regex;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex");
}

pub const NAME_REQUIRED: &str = "Please add a name";
pub const EMAIL_REQUIRED: &str = "Please add an email";
pub const EMAIL_INVALID: &str = "Please add a valid email";
pub const PHONE_REQUIRED: &str = "Please add a phone number";
pub const COMPANY_REQUIRED: &str = "Please add a company name";
pub const ADDRESS_REQUIRED: &str = "Please add an address";
pub const CITY_REQUIRED: &str = "Please add a city";
pub const ZIPCODE_REQUIRED: &str = "Please add a zipcode";
pub const GEO_REQUIRED: &str = "Please add geo coordinates";
pub const LAT_REQUIRED: &str = "Please add a latitude";
pub const LNG_REQUIRED: &str = "Please add a longitude";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Required text: absent or empty is a violation.
fn required(value: &Option<String>, message: &str, errors: &mut Vec<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => {
            errors.push(message.to_string());
            String::new()
        }
    }
}

/// Checks every rule and returns all violations, in schema order.
pub fn validate_new(input: &UserInput) -> Result<NewUser, Vec<String>> {
    let mut errors = Vec::new();

    let trimmed_name = input.name.as_ref().map(|n| n.trim().to_string());
    let name = required(&trimmed_name, NAME_REQUIRED, &mut errors);

    let email = required(&input.email, EMAIL_REQUIRED, &mut errors);
    if !email.is_empty() && !is_valid_email(&email) {
        errors.push(EMAIL_INVALID.to_string());
    }

    let phone = required(&input.phone, PHONE_REQUIRED, &mut errors);
    let company = required(&input.company, COMPANY_REQUIRED, &mut errors);

    let address = match &input.address {
        Some(a) => {
            let city = required(&a.city, CITY_REQUIRED, &mut errors);
            let zipcode = required(&a.zipcode, ZIPCODE_REQUIRED, &mut errors);
            let geo = match &a.geo {
                Some(g) => Geo {
                    lat: required(&g.lat, LAT_REQUIRED, &mut errors),
                    lng: required(&g.lng, LNG_REQUIRED, &mut errors),
                },
                None => {
                    errors.push(GEO_REQUIRED.to_string());
                    Geo { lat: String::new(), lng: String::new() }
                }
            };
            Address { city, zipcode, geo }
        }
        None => {
            errors.push(ADDRESS_REQUIRED.to_string());
            Address {
                city: String::new(),
                zipcode: String::new(),
                geo: Geo { lat: String::new(), lng: String::new() },
            }
        }
    };

    if errors.is_empty() {
        Ok(NewUser { name, email, phone, company, address })
    } else {
        Err(errors)
    }
}

/// Validates the merged document, then keeps only the fields the caller supplied.
pub fn validate_patch(input: &UserInput, existing: &User) -> Result<UserPatch, Vec<String>> {
    let merged = validate_new(&input.merged_onto(existing))?;

    Ok(UserPatch {
        name: input.name.as_ref().map(|_| merged.name),
        email: input.email.as_ref().map(|_| merged.email),
        phone: input.phone.as_ref().map(|_| merged.phone),
        company: input.company.as_ref().map(|_| merged.company),
        address: input.address.as_ref().map(|_| merged.address),
    })
}
