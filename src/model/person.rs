use serde::{Deserialize, Serialize};

use crate::consts::consts::PersonId;

/// A person as held by the directory. Optional contact details are `None` when absent,
/// the transport decides how absence is presented on the wire
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The mutable fields of a person, used for both create and full-replace update
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonData {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Person {
    pub fn from_data(id: PersonId, data: PersonData) -> Self {
        Person {
            id,
            name: data.name,
            email: data.email,
            phone: data.phone,
        }
    }

    pub fn data(&self) -> PersonData {
        PersonData {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl PersonData {
    pub fn new(name: String, email: Option<String>, phone: Option<String>) -> Self {
        PersonData { name, email, phone }
    }

    pub fn new_test() -> Self {
        PersonData {
            name: "Taro Yamada".to_string(),
            email: Some("taro@example.com".to_string()),
            phone: Some("090-1234-5678".to_string()),
        }
    }
}
