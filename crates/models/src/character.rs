use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Race {
    Human,
}

impl Race {
    pub fn as_str(&self) -> &'static str {
        match self {
            Race::Human => "HUMAN",
        }
    }
}

impl std::str::FromStr for Race {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HUMAN" => Ok(Race::Human),
            _ => Err(format!("Invalid race: {}", s)),
        }
    }
}

/// Character listing entry. Only the name is exposed when listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub name: String,
}

/// Returned after a character is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedCharacter {
    pub name: String,
    pub race: Race,
}
