use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

const BUILTIN_ROSTER_JSON: &str = include_str!("../assets/demo_roster.json");

/// Catalog names used by the autogenerate operation. Shipped as an
/// embedded JSON asset; names are stored upper-case like every other
/// catalog entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DemoRoster {
    pub samples: Vec<String>,
    pub tests: Vec<String>,
    pub equipment: Vec<String>,
}

impl DemoRoster {
    pub fn from_json_text(json_text: &str) -> Result<Self> {
        let roster: Self = serde_json::from_str(json_text)?;
        if roster.samples.is_empty() || roster.tests.is_empty() || roster.equipment.is_empty() {
            return Err(anyhow!("Demo roster has an empty catalog section"));
        }
        Ok(roster)
    }

    pub fn builtin() -> Self {
        Self::from_json_text(BUILTIN_ROSTER_JSON).expect("Builtin demo roster is malformed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster_loads() {
        let roster = DemoRoster::builtin();
        assert_eq!(roster.samples.len(), 8);
        assert_eq!(roster.tests.len(), 9);
        assert_eq!(roster.equipment.len(), 14);
        assert!(roster.samples.contains(&"JANE DOE".to_string()));
        assert!(roster.equipment.contains(&"AUTOCLAVE".to_string()));
    }

    #[test]
    fn test_roster_names_are_uppercase() {
        let roster = DemoRoster::builtin();
        for name in roster
            .samples
            .iter()
            .chain(&roster.tests)
            .chain(&roster.equipment)
        {
            assert_eq!(*name, name.to_uppercase());
        }
    }

    #[test]
    fn test_empty_section_is_rejected() {
        let result =
            DemoRoster::from_json_text(r#"{"samples":[],"tests":["HCV"],"equipment":["OVEN"]}"#);
        assert!(result.is_err());
    }
}
