use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("Invalid priority '{}', expected high, medium or low", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    // Older task files carry no id or a numeric one; a missing id is assigned on load
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub username: String,  // owner, taken from the session at creation
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<StoredId>::deserialize(deserializer)? {
        Some(StoredId::Text(id)) => id,
        Some(StoredId::Number(id)) => id.to_string(),
        None => String::new(),
    })
}

impl Task {
    pub fn matches(&self, keyword: &str) -> bool {
        self.title.contains(keyword) || self.description.contains(keyword)
    }
}
