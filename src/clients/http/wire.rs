use serde::{Deserialize, Serialize};

use crate::{
    consts::consts::PersonId,
    model::person::{Person, PersonData},
};

/// Request body for create and update. Every field may be left out or null, a missing name
/// is then caught by validation rather than by decoding
#[derive(Deserialize, Debug)]
pub struct PersonBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl PersonBody {
    pub fn to_person_data(self) -> PersonData {
        PersonData {
            name: self.name.unwrap_or_default(),
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Person as sent to clients, absent contact details are empty strings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonResponse {
    pub id: PersonId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl PersonResponse {
    pub fn from_person(person: Person) -> PersonResponse {
        PersonResponse {
            id: person.id,
            name: person.name,
            email: person.email.unwrap_or_default(),
            phone: person.phone.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
