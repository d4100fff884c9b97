//! Per-turn conversation dispatcher
//!
//! One user message in, one reply out, with the precedence order fixed here:
//! scope guard first (always wins), then restart, list, goal detail, the
//! active collection flow (which bypasses the remaining classifiers), new
//! goal, and only then the text generator. The generator is optional and
//! soft: offline or empty output falls through to canned replies.

use tracing::debug;

use crate::ai::{GeneratorClient, TextGenerator};
use crate::flow;
use crate::intent::IntentRules;
use crate::models::{Stage, UserState};
use crate::prompt::{build_agent_prompt, ChatMessage};

const RESTART_REPLY: &str =
    "Fluxo atual reiniciado. Se quiser criar outra meta, diga `nova meta`.";

const HELP_REPLY: &str =
    "Funciona em 3 passos: criar meta, simular aporte e acompanhar progresso. \
     Comandos uteis: `nova meta`, `listar metas`, `meta 1`.";

const GENERIC_REPLY: &str =
    "Posso te ajudar com planejamento financeiro por metas. \
     Diga seu sonho ou use `nova meta`.";

const GENERATION_FAILED_REPLY: &str =
    "Nao consegui gerar resposta agora. Tente novamente ou use `nova meta`, `listar metas`.";

/// The conversational engine for one turn at a time.
///
/// Holds no per-user state: callers pass in the (already isolated)
/// `UserState` and persist it afterwards. Safe to share across users.
#[derive(Default)]
pub struct Assistant {
    rules: IntentRules,
    generator: Option<GeneratorClient>,
}

impl Assistant {
    /// Deterministic-only assistant with the default rule tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a text generator consulted when nothing deterministic applies.
    pub fn with_generator(mut self, generator: GeneratorClient) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Swap the intent rule tables.
    pub fn with_rules(mut self, rules: IntentRules) -> Self {
        self.rules = rules;
        self
    }

    /// Process one turn.
    pub async fn respond(
        &self,
        state: &mut UserState,
        message: &str,
        history: &[ChatMessage],
    ) -> String {
        if let Some(reply) = self.respond_deterministic(state, message) {
            return reply;
        }

        if let Some(generator) = &self.generator {
            let (online, _) = generator.health_check().await;
            if online {
                let prompt = build_agent_prompt(&state.goals, history, message);
                let text = generator.generate(&prompt).await;
                if !text.is_empty() {
                    return text;
                }
                return GENERATION_FAILED_REPLY.to_string();
            }
            debug!(host = %generator.host(), "generator offline, using canned reply");
        }

        self.canned_fallback(message)
    }

    /// The fixed-precedence deterministic chain. `None` means no core
    /// component can answer and the generator (or canned text) takes over.
    fn respond_deterministic(&self, state: &mut UserState, message: &str) -> Option<String> {
        if let Some(block) = self.rules.detect_out_of_scope(message) {
            return Some(block.to_string());
        }

        if self.rules.detect_restart_intent(message) {
            state.reset_flow();
            return Some(RESTART_REPLY.to_string());
        }

        if self.rules.detect_list_goals_intent(message) {
            return Some(flow::list_goals_text(state));
        }

        if let Some(id) = self.rules.detect_goal_detail_intent(message) {
            return Some(flow::goal_detail_text(state, id));
        }

        // an active collection flow consumes everything else
        if state.stage != Stage::Idle {
            return Some(flow::handle_collection(state, message));
        }

        if self.rules.should_start_goal_flow(message) {
            return Some(flow::start_new_goal_flow(state, Some(message)));
        }

        None
    }

    fn canned_fallback(&self, message: &str) -> String {
        if self.rules.detect_help_intent(message) {
            HELP_REPLY.to_string()
        } else {
            GENERIC_REPLY.to_string()
        }
    }
}
