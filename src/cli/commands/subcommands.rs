use crate::agent::tools::register_all_tools;
use crate::agent::{AgentLoop, AgentLoopConfig, Conversation, LoopResult, Termination};
use crate::config::Config;
use crate::providers::openai::OpenAIClient;
use anyhow::{Result, bail};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Line that ends one multi-line message in `chat`.
pub(super) const END_OF_INPUT: &str = "[[exit]]";
const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];
const LIMIT_NOTICE: &str = "Error: Maximum iterations reached without getting a final answer.";

pub(super) fn build_agent(config: &Config) -> Result<AgentLoop> {
    let openai = &config.providers.openai;
    if openai.api_key.is_empty() {
        bail!(
            "No OpenAI API key configured. Set providers.openai.apiKey or REACT_AGENT_OPENAI_API_KEY."
        );
    }

    let client = Arc::new(OpenAIClient::new(
        openai.api_key.clone(),
        config.agent.model.clone(),
        &openai.api_base,
        config.agent.max_tokens,
        config.agent.temperature,
    ));
    let tools = Arc::new(register_all_tools(config)?);
    Ok(AgentLoop::new(AgentLoopConfig::from_config(
        config, client, tools,
    )))
}

/// Run one turn with Ctrl-C wired to cancellation.
async fn run_turn(
    agent: &AgentLoop,
    conversation: &mut Conversation,
    max_iterations: usize,
) -> Result<LoopResult> {
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };
    let result = agent
        .run_with_cancel(conversation, max_iterations, &token)
        .await;
    watcher.abort();
    Ok(result?)
}

fn render(result: &LoopResult) -> String {
    match result.terminated {
        Termination::Answered => result.final_text.clone().unwrap_or_default(),
        Termination::IterationLimitReached => LIMIT_NOTICE.to_string(),
        Termination::Cancelled => "(cancelled)".to_string(),
    }
}

pub(super) async fn ask(config: &Config, message: &str) -> Result<()> {
    let agent = build_agent(config)?;
    let mut conversation = Conversation::with_system(&config.agent.system_prompt);
    conversation.push_user(message);

    let result = run_turn(&agent, &mut conversation, config.agent.max_iterations).await?;
    info!(
        "Finished after {} iteration(s): {:?}",
        result.iterations_used, result.terminated
    );
    println!("{}", render(&result));
    Ok(())
}

/// Read lines until `[[exit]]` or EOF. `None` means EOF with nothing read.
pub(super) async fn read_message<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf).await? == 0 {
            if lines.is_empty() {
                return Ok(None);
            }
            break;
        }
        let line = buf.trim_end_matches(['\n', '\r']);
        if line == END_OF_INPUT {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(Some(lines.join("\n")))
}

pub(super) fn is_quit(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    QUIT_WORDS.contains(&input.as_str())
}

pub(super) async fn chat(config: &Config) -> Result<()> {
    let agent = build_agent(config)?;
    let mut conversation = Conversation::with_system(&config.agent.system_prompt);
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all(
                format!(
                    "\nEnter your message (finish with a line {}; quit/exit/q to leave):\n",
                    END_OF_INPUT
                )
                .as_bytes(),
            )
            .await?;
        stdout.flush().await?;

        let Some(input) = read_message(&mut stdin).await? else {
            break;
        };
        if is_quit(&input) {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        conversation.push_user(input);
        match run_turn(&agent, &mut conversation, config.agent.max_iterations).await {
            Ok(result) => println!("Assistant: {}", render(&result)),
            // The log stays valid after a failed run, so the session can go on.
            Err(e) => {
                warn!("Run failed: {:#}", e);
                eprintln!("Error: {:#}", e);
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

pub(super) fn list_tools(config: &Config) -> Result<()> {
    let tools = register_all_tools(config)?;
    if tools.is_empty() {
        println!("No tools enabled.");
        return Ok(());
    }
    for def in tools.definitions() {
        println!("{:<44} {}", def.name, def.description);
    }
    Ok(())
}
