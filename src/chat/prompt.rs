//! Outbound prompt construction
//!
//! A [`Prompt`] is a borrowed view over the system instruction, the
//! caller's turns and the sampling parameters. Backends pick the encoding
//! they need: one flattened string, or a structured message list.

use super::profile::{PromptProfile, SamplingParams};
use super::types::{ChatTurn, Role};

#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    pub system: &'a str,
    pub turns: &'a [ChatTurn],
    pub sampling: &'a SamplingParams,
}

impl<'a> Prompt<'a> {
    pub fn new(profile: &'a PromptProfile, turns: &'a [ChatTurn]) -> Self {
        Self {
            system: &profile.system_prompt,
            turns,
            sampling: &profile.sampling,
        }
    }

    /// System instruction, a blank line, then one `role: content` line per turn
    pub fn flatten(&self) -> String {
        let history = self
            .turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n{history}", self.system)
    }

    /// Flattened prompt wrapped as a single user message
    pub fn as_single_user_message(&self) -> Vec<ChatTurn> {
        vec![ChatTurn::new(Role::User, self.flatten())]
    }

    /// System instruction as a leading entry, turns passed through unmodified
    pub fn structured(&self) -> Vec<ChatTurn> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(ChatTurn::new(Role::System, self.system));
        messages.extend_from_slice(self.turns);
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diwali() -> Vec<ChatTurn> {
        vec![ChatTurn::new(Role::User, "Why is Diwali celebrated?")]
    }

    #[test]
    fn test_flatten_puts_system_prompt_first() {
        let profile = PromptProfile::builtin("culture").unwrap();
        let turns = diwali();
        let text = Prompt::new(&profile, &turns).flatten();

        assert!(text.starts_with(&profile.system_prompt));
        let system_at = text.find(&profile.system_prompt).unwrap();
        let turn_at = text.find("user: Why is Diwali celebrated?").unwrap();
        assert!(system_at < turn_at);
        assert!(text.ends_with("\n\nuser: Why is Diwali celebrated?"));
    }

    #[test]
    fn test_flatten_joins_turns_in_order() {
        let profile = PromptProfile::builtin("culture").unwrap();
        let turns = vec![
            ChatTurn::new(Role::User, "What is a saree?"),
            ChatTurn::new(Role::Assistant, "A draped garment."),
            ChatTurn::new(Role::User, ""),
        ];
        let text = Prompt::new(&profile, &turns).flatten();
        assert!(text.ends_with("user: What is a saree?\nassistant: A draped garment.\nuser: "));
    }

    #[test]
    fn test_empty_history_still_carries_system_prompt() {
        let profile = PromptProfile::builtin("attire").unwrap();
        let prompt = Prompt::new(&profile, &[]);
        assert_eq!(prompt.flatten(), format!("{}\n\n", profile.system_prompt));

        let messages = prompt.structured();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::System);
    }

    #[test]
    fn test_structured_keeps_turns_unmodified() {
        let profile = PromptProfile::builtin("culture").unwrap();
        let turns = diwali();
        let messages = Prompt::new(&profile, &turns).structured();
        assert_eq!(messages[0], ChatTurn::new(Role::System, profile.system_prompt.clone()));
        assert_eq!(&messages[1..], turns.as_slice());
    }

    #[test]
    fn test_single_user_message() {
        let profile = PromptProfile::builtin("culture").unwrap();
        let turns = diwali();
        let prompt = Prompt::new(&profile, &turns);
        let messages = prompt.as_single_user_message();
        assert_eq!(messages, vec![ChatTurn::new(Role::User, prompt.flatten())]);
    }
}
