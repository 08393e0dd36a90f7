use rig::{agent::Agent, client::CompletionClient, providers::openrouter};

const CHAT_MODEL: &str = "openai/gpt-4o-mini";
const MAX_COMPLETION_TOKENS: u64 = 1500;
const TEMPERATURE: f64 = 0.3;

/// Build a completion agent with the given system prompt as preamble.
pub fn get_llm_agent(preamble: &str) -> anyhow::Result<Agent<openrouter::CompletionModel>> {
    let api_key = std::env::var("OPENROUTER_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENROUTER_API_KEY not set"))?;
    let client = openrouter::Client::new(&api_key);
    let agent = client
        .agent(CHAT_MODEL)
        .preamble(preamble)
        .temperature(TEMPERATURE)
        .max_tokens(MAX_COMPLETION_TOKENS)
        .build();
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_builds_against_the_configured_key() {
        match std::env::var("OPENROUTER_API_KEY") {
            Ok(_) => assert!(get_llm_agent("test preamble").is_ok()),
            Err(_) => {
                let err = match get_llm_agent("test preamble") {
                    Ok(_) => panic!("expected get_llm_agent to fail without OPENROUTER_API_KEY"),
                    Err(e) => e,
                };
                assert!(err.to_string().contains("OPENROUTER_API_KEY"));
            }
        }
    }
}
