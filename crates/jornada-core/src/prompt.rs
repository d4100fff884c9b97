//! Prompt assembly for the text generator
//!
//! Deterministic context building: the system prompt, a summary of the
//! user's goals, and the tail of the chat history. The generator only ever
//! sees prompts built here.

use serde::{Deserialize, Serialize};

use crate::models::Goal;
use crate::parse::format_currency;

/// Messages of history included in a prompt.
const HISTORY_TAIL: usize = 10;
/// Goals summarized in a prompt.
const GOALS_IN_CONTEXT: usize = 10;

/// System prompt framing the assistant's persona and hard rules.
pub const SYSTEM_PROMPT: &str = "\
Voce e a Jornada, uma planejadora financeira amigavel e didatica.

OBJETIVO:
Transformar sonhos em metas matematicas de forma simples e segura.

REGRAS:
- NUNCA recomende investimentos especificos como ordem de compra;
- NUNCA prometa rendimento futuro;
- JAMAIS responda perguntas fora de financas pessoais;
- Se nao souber algo, admita com transparencia e ofereca explicacao educativa;
- Sempre mantenha linguagem simples, direta e sem jargao desnecessario;
- Sempre pergunte no final se a pessoa quer ajustar prazo, valor-meta ou aporte;
- Responda em no maximo 3 paragrafos curtos.";

/// Who said a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: ChatRole::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.to_string(),
        }
    }
}

/// One-line-per-goal summary for prompt context.
pub fn build_goals_context(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "Usuario ainda sem metas.".to_string();
    }
    goals
        .iter()
        .take(GOALS_IN_CONTEXT)
        .map(|goal| {
            format!(
                "- Meta {}: {} | valor {} | prazo {} meses | status {}",
                goal.id,
                goal.name,
                format_currency(goal.target_amount),
                goal.term_months,
                goal.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The last few history messages, one `ROLE: content` line each.
pub fn format_chat_history(messages: &[ChatMessage]) -> String {
    let start = messages.len().saturating_sub(HISTORY_TAIL);
    messages[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full prompt for one generator call.
pub fn build_agent_prompt(goals: &[Goal], history: &[ChatMessage], user_message: &str) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\n\
         METAS DO USUARIO:\n{}\n\n\
         HISTORICO DA CONVERSA:\n{}\n\n\
         MENSAGEM DO USUARIO:\n{user_message}\n\n\
         INSTRUCOES FINAIS:\n\
         - Responda em portugues do Brasil.\n\
         - Seja objetiva e util.\n\
         - Se usuario perguntar como funciona, explique em passos simples.\n\
         - Se usuario pedir recomendacao de ativo, recuse e ofereca simulacao de meta.\n\
         - Se faltar dado para simulacao, peca os dados faltantes.",
        build_goals_context(goals),
        format_chat_history(history),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalStatus, Scenarios};
    use crate::simulation::compute_scenarios;
    use chrono::Utc;

    fn sample_goal(id: u32) -> Goal {
        let scenarios: Scenarios = compute_scenarios(35_000.0, 0.0, 24);
        Goal {
            id,
            name: "Viagem no Japao".to_string(),
            target_amount: 35_000.0,
            term_months: 24,
            initial_amount: 0.0,
            monthly_income: 0.0,
            scenarios,
            status: GoalStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_goals_context_empty() {
        assert_eq!(build_goals_context(&[]), "Usuario ainda sem metas.");
    }

    #[test]
    fn test_goals_context_lines() {
        let context = build_goals_context(&[sample_goal(1), sample_goal(2)]);
        assert_eq!(context.lines().count(), 2);
        assert!(context.contains("Meta 1: Viagem no Japao"));
        assert!(context.contains("R$ 35.000,00"));
        assert!(context.contains("status active"));
    }

    #[test]
    fn test_history_keeps_only_tail() {
        let messages: Vec<ChatMessage> = (0..15)
            .map(|i| ChatMessage::user(&format!("msg {i}")))
            .collect();
        let history = format_chat_history(&messages);
        assert_eq!(history.lines().count(), 10);
        assert!(history.starts_with("USER: msg 5"));
        assert!(history.ends_with("msg 14"));
    }

    #[test]
    fn test_agent_prompt_sections() {
        let prompt = build_agent_prompt(&[], &[ChatMessage::assistant("oi")], "como funciona?");
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("METAS DO USUARIO:"));
        assert!(prompt.contains("ASSISTANT: oi"));
        assert!(prompt.contains("MENSAGEM DO USUARIO:\ncomo funciona?"));
    }
}
