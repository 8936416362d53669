//! `recordpilot interview`: Practice one interview question on a topic.

use recordpilot_agent::{Interviewer, format_error};
use recordpilot_core::platform::StoreConnector;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::{load_config, platform_client, target_instance};

pub async fn run(topic: String, instance: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let instance = target_instance(&config, instance)?;
    let store = platform_client(&config)?.connect(&instance)?;
    let provider = recordpilot_providers::build_from_config(&config)?;
    let interviewer = Interviewer::from_config(provider, &config);

    let question = match interviewer.ask_question(store.as_ref(), &topic).await {
        Ok(question) => question,
        Err(e) => {
            println!("{}", format_error(&e));
            return Ok(());
        }
    };
    println!("INTERVIEWER: {question}\n");
    print!("Your answer: ");
    std::io::stdout().flush()?;

    let answer = read_answer(BufReader::new(tokio::io::stdin())).await?;
    match interviewer.grade_answer(&topic, &question, &answer).await {
        Ok(grade) => println!("\nREPORT CARD:\n{}", grade.render()),
        Err(e) => println!("{}", format_error(&e)),
    }

    Ok(())
}

/// First non-blank line of input.
async fn read_answer<R>(reader: R) -> Result<String, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
    }
    Err("No answer given".into())
}
