use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "My Assistant";
pub const DEFAULT_ROLE: &str = "General Helper";
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant.";

/// The single agent persona. Missing fields in incoming JSON become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub instructions: String,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            instructions: instructions.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new("", "", "")
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_ROLE, DEFAULT_INSTRUCTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::Persona;
    use serde_json::json;

    #[test]
    fn default_persona_uses_fixed_values() {
        let persona = Persona::default();
        assert_eq!(persona.name, "My Assistant");
        assert_eq!(persona.role, "General Helper");
        assert_eq!(persona.instructions, "You are a helpful assistant.");
    }

    #[test]
    fn missing_fields_deserialize_to_empty_strings() {
        let persona: Persona =
            serde_json::from_value(json!({"name": "Only a name"})).expect("deserialize");
        assert_eq!(persona, Persona::new("Only a name", "", ""));
    }

    #[test]
    fn serializes_with_plain_field_names() {
        let value = serde_json::to_value(Persona::new("X", "Y", "Z")).expect("serialize");
        assert_eq!(value, json!({"name": "X", "role": "Y", "instructions": "Z"}));
    }
}
