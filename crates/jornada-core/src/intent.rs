//! Intent classification
//!
//! Stateless keyword classifiers over normalized text. The keyword lists are
//! configuration carried by [`IntentRules`], not algorithm: swap the tables
//! to retune scope or intents without touching the matching code. Precedence
//! between classifiers is encoded at the call site (see `assistant`).

use regex::Regex;

use crate::text::normalize;

/// Fixed refusal sent for off-topic questions.
pub const SCOPE_BLOCK_MESSAGE: &str =
    "Eu so respondo assuntos de financas pessoais e planejamento de metas. \
     Posso te ajudar com sonhos, metas, simulacoes e organizacao financeira.";

/// Keyword tables driving every classifier.
///
/// All entries must already be in normalized form (ASCII, lowercase).
#[derive(Debug, Clone)]
pub struct IntentRules {
    /// Off-topic phrase fragments that block a message outright.
    pub off_topic: Vec<&'static str>,
    /// Sports-result terms; block only when a team name co-occurs.
    pub sports_terms: Vec<&'static str>,
    /// Known team names.
    pub team_keywords: Vec<&'static str>,
    pub restart: Vec<&'static str>,
    pub list_goals: Vec<&'static str>,
    pub new_goal: Vec<&'static str>,
    pub help: Vec<&'static str>,
}

impl Default for IntentRules {
    fn default() -> Self {
        Self {
            off_topic: vec![
                "previsao do tempo",
                "qual o clima",
                "vai chover",
                "temperatura",
                "resultado do jogo",
                "placar",
                "campeonato",
                "rodada",
                "partida",
                "filme",
                "serie",
                "receita culinaria",
            ],
            sports_terms: vec![
                "jogo",
                "joga",
                "placar",
                "resultado",
                "rodada",
                "gol",
                "campeonato",
            ],
            team_keywords: vec![
                "santos",
                "flamengo",
                "palmeiras",
                "corinthians",
                "sao paulo",
                "vasco",
                "gremio",
                "internacional",
                "botafogo",
                "atletico",
                "cruzeiro",
            ],
            restart: vec![
                "reiniciar",
                "recomecar",
                "comecar de novo",
                "outro plano",
                "novo plano",
                "resetar",
                "reset",
            ],
            list_goals: vec![
                "listar metas",
                "minhas metas",
                "ver metas",
                "consultar metas",
                "mostrar metas",
            ],
            new_goal: vec![
                "nova meta",
                "novo plano",
                "criar meta",
                "adicionar meta",
                "mais uma meta",
                "outra meta",
                "quero",
                "sonho",
            ],
            help: vec![
                "como funciona",
                "como usar",
                "o que voce faz",
                "explica a aplicacao",
                "explica o app",
                "ajuda",
            ],
        }
    }
}

impl IntentRules {
    /// Scope guard: fixed refusal for off-topic questions, `None` otherwise.
    pub fn detect_out_of_scope(&self, text: &str) -> Option<&'static str> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }

        if self.off_topic.iter().any(|p| normalized.contains(p)) {
            return Some(SCOPE_BLOCK_MESSAGE);
        }

        let mentions_result = self.sports_terms.iter().any(|t| normalized.contains(t));
        let mentions_team = self.team_keywords.iter().any(|t| normalized.contains(t));
        if mentions_result && mentions_team {
            return Some(SCOPE_BLOCK_MESSAGE);
        }

        if normalized.contains("clima")
            || normalized.contains("tempo amanha")
            || normalized.contains("tempo hoje")
        {
            return Some(SCOPE_BLOCK_MESSAGE);
        }

        None
    }

    pub fn detect_restart_intent(&self, text: &str) -> bool {
        let normalized = normalize(text);
        self.restart.iter().any(|t| normalized.contains(t))
    }

    pub fn detect_list_goals_intent(&self, text: &str) -> bool {
        let normalized = normalize(text);
        self.list_goals.iter().any(|t| normalized.contains(t))
    }

    /// Goal-detail intent: requires "meta" followed by an integer id.
    ///
    /// Ids too large for `u64` saturate to `u64::MAX`; no stored goal can
    /// carry that id, so the lookup answers "not found" instead of treating
    /// the message as free-form chat.
    pub fn detect_goal_detail_intent(&self, text: &str) -> Option<u64> {
        let normalized = normalize(text);
        if !normalized.contains("meta") {
            return None;
        }
        let re = Regex::new(r"meta\s*(\d+)").ok()?;
        let digits = re.captures(&normalized)?.get(1)?.as_str();
        Some(digits.parse().unwrap_or(u64::MAX))
    }

    /// New-goal intent. Overinclusive on purpose ("quero", "sonho"); the
    /// dispatcher combines it with a help-intent check before acting.
    pub fn detect_new_goal_intent(&self, text: &str) -> bool {
        let normalized = normalize(text);
        self.new_goal.iter().any(|t| normalized.contains(t))
    }

    pub fn detect_help_intent(&self, text: &str) -> bool {
        let normalized = normalize(text);
        self.help.iter().any(|t| normalized.contains(t))
    }

    /// Whether a message should open a goal-collection flow: a new-goal
    /// intent that is not simultaneously asking how the assistant works.
    pub fn should_start_goal_flow(&self, text: &str) -> bool {
        self.detect_new_goal_intent(text)
            && !self.detect_help_intent(text)
            && !normalize(text).contains("como funciona")
    }
}
