//! Command implementations

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::info;

use jornada_core::{
    flow, Assistant, ChatMessage, GeneratorClient, StateStore, TextGenerator,
};

use crate::cli::Cli;

const GREETING: &str =
    "Oi, eu sou a Jornada. Sou um agente de planejamento financeiro por metas. \
     Posso explicar como funciona, criar metas, listar metas e detalhar simulacoes. \
     (digite `sair` para encerrar)";

/// Resolve the generator from flags and environment, if any.
/// `--model` overrides whatever model the base configuration picked.
pub fn build_generator(cli: &Cli) -> Option<GeneratorClient> {
    if cli.no_ollama {
        return None;
    }
    let client = match &cli.ollama_url {
        Some(url) => GeneratorClient::ollama(url, "gpt-oss"),
        None => GeneratorClient::from_env()?,
    };
    match &cli.model {
        Some(model) => Some(client.with_model(model)),
        None => Some(client),
    }
}

/// Resolve the state store from flags.
pub fn build_store(cli: &Cli) -> StateStore {
    match &cli.state_file {
        Some(path) => StateStore::new(path),
        None => StateStore::new(StateStore::default_path()),
    }
}

/// Interactive chat loop: read a line, respond, persist, repeat.
pub async fn cmd_chat(cli: &Cli) -> Result<()> {
    let store = build_store(cli);
    let mut state = store.load(&cli.user);

    let mut assistant = Assistant::new();
    if let Some(generator) = build_generator(cli) {
        info!(host = %generator.host(), model = %generator.model(), "generator configured");
        assistant = assistant.with_generator(generator);
    }

    println!("{GREETING}");
    let mut history: Vec<ChatMessage> = vec![ChatMessage::assistant(GREETING)];

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "sair" | "exit" | "quit") {
            break;
        }

        let reply = assistant.respond(&mut state, message, &history).await;
        println!("{reply}");

        history.push(ChatMessage::user(message));
        history.push(ChatMessage::assistant(&reply));
        store.save(&mut state)?;
    }

    println!("Ate logo! Suas metas ficam salvas em {}.", store.path().display());
    Ok(())
}

/// Print the saved goals of a user.
pub fn cmd_goals(cli: &Cli) -> Result<()> {
    let store = build_store(cli);
    let state = store.load(&cli.user);
    println!("{}", flow::list_goals_text(&state));
    Ok(())
}

/// Print the details of one goal.
pub fn cmd_goal(cli: &Cli, id: u64) -> Result<()> {
    let store = build_store(cli);
    let state = store.load(&cli.user);
    println!("{}", flow::goal_detail_text(&state, id));
    Ok(())
}

/// Report generator connectivity and the known store users.
pub async fn cmd_status(cli: &Cli) -> Result<()> {
    match build_generator(cli) {
        Some(generator) => {
            let (online, models) = generator.health_check().await;
            if online {
                println!("Ollama conectado em {}", generator.host());
                if !models.is_empty() {
                    println!("Modelos: {}", models.join(", "));
                }
            } else {
                println!(
                    "Ollama offline em {} (respostas deterministicas apenas)",
                    generator.host()
                );
            }
        }
        None => println!("Gerador desabilitado (use --ollama-url ou OLLAMA_HOST)."),
    }

    let store = build_store(cli);
    let users = store.user_ids();
    println!("Arquivo de estado: {}", store.path().display());
    if users.is_empty() {
        println!("Nenhum usuario cadastrado ainda.");
    } else {
        println!("Usuarios: {}", users.join(", "));
    }
    Ok(())
}
