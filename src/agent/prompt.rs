use super::persona::Persona;

/// Builds the system prompt that puts the model into the persona. Fields are
/// embedded verbatim.
pub fn system_prompt(persona: &Persona) -> String {
    format!(
        "You are {name}.\nYour Role is: {role}.\nYour specific instructions are: {instructions}.\nStay strictly within this persona.",
        name = persona.name,
        role = persona.role,
        instructions = persona.instructions,
    )
}
