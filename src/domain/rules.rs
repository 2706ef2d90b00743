use serde::{Deserialize, Serialize};

/// Business rules deciding who is a foreign client and which offices serve them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRules {
    /// Accepted spellings of the home country.
    #[serde(default = "default_home_countries")]
    pub home_countries: Vec<String>,
    /// Offices whose managers serve foreign and unlocatable clients.
    #[serde(default = "default_foreign_office_ids")]
    pub foreign_office_ids: Vec<String>,
}

fn default_home_countries() -> Vec<String> {
    vec!["Казахстан".to_string(), "Kazahstan".to_string()]
}

fn default_foreign_office_ids() -> Vec<String> {
    vec!["Отдел 1".to_string(), "Отдел 2".to_string()]
}

impl Default for AssignmentRules {
    fn default() -> Self {
        Self {
            home_countries: default_home_countries(),
            foreign_office_ids: default_foreign_office_ids(),
        }
    }
}

impl AssignmentRules {
    /// Countries match only as spelled in the list; other spellings are foreign.
    pub fn is_home_country(&self, country: &str) -> bool {
        self.home_countries.iter().any(|home| home == country)
    }

    pub fn is_foreign_office(&self, office_id: &str) -> bool {
        let office_id = office_id.trim();
        self.foreign_office_ids
            .iter()
            .any(|id| ids_match(id.trim(), office_id))
    }
}

/// Case-insensitive comparison that does not depend on the process locale.
pub fn ids_match(a: &str, b: &str) -> bool {
    a == b || normalize_id(a) == normalize_id(b)
}

/// Key used to index offices: trimmed and lowercased per Unicode rules.
pub fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}
