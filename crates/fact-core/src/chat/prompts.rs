//! Prompt templates

use crate::catalog::Catalog;

/// Number of transcript lines the facilitator sees
pub const FACILITATOR_HISTORY: usize = 5;

/// System instruction for the competition advisor
pub fn advisor_instruction(catalog: &Catalog) -> String {
    let listing = catalog
        .all()
        .iter()
        .map(|c| {
            format!(
                "- {} ({}): {}, Date: {}, Format: {}",
                c.name,
                c.short_name.as_deref().unwrap_or(""),
                c.category,
                c.date,
                c.format.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert academic guidance counselor for high school students called \"FACT Advisor\".\n\
         Your goal is to help students find the best academic competitions for them based on their interests, grade level, and goals.\n\
         You have access to a database of competitions (Math, Physics, Chemistry, Biology, Economics, Informatics, Linguistics).\n\
         When a user asks for advice, recommend specific competitions from the provided Context list.\n\
         Always highlight the \"Participation\" format (Individual vs Team) because this app focuses on team formation.\n\
         Be encouraging, professional, and concise.\n\
         \n\
         Context - Available Competitions:\n{}\n",
        listing
    )
}

/// Prompt for the simulated teammate
pub fn teammate_prompt(name: &str, bio: &str, message: &str, history: &[String]) -> String {
    format!(
        "You are roleplaying as a high school student named {name}.\n\
         Your background: {bio}.\n\
         You have just accepted a team request from another student.\n\
         \n\
         Current conversation history:\n{history}\n\
         \n\
         The other student just said: \"{message}\"\n\
         \n\
         Reply naturally, casually, and briefly (1-2 sentences). Be friendly.\n\
         Do not include \"System:\" or \"Me:\" prefixes.\n",
        history = history.join("\n"),
    )
}

/// Prompt for the facilitator. Only the most recent lines are included.
pub fn facilitator_prompt(history: &[String]) -> String {
    let recent = &history[history.len().saturating_sub(FACILITATOR_HISTORY)..];
    format!(
        "You are an AI Facilitator in a chat between two high school students forming a competition team.\n\
         Your goal is to interrupt politely with a \"Question of the moment\" to help them understand each other's personality and working style.\n\
         \n\
         Recent chat history:\n{}\n\
         \n\
         Generate ONE single, short, engaging question for them to answer.\n\
         Examples: \"What's your biggest strength in a team?\", \"Do you prefer working late at night or early morning?\", \"How do you handle disagreements?\"\n\
         \n\
         Return ONLY the question.\n",
        recent.join("\n")
    )
}
