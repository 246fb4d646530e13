use crate::controller::{
    ClearOutcome,
    ConversationController,
    RejectReason,
    SubmitOutcome,
    CLEAR_CONFIRMATION_PROMPT,
};
use crate::models::chat::Message;
use chrono::{ DateTime, Local };
use log::{ error, info };
use std::error::Error;
use std::path::Path;
use tokio::io::{ AsyncBufReadExt, BufReader };

const GREETING: &str = "Hello! I'm aaron-o1.\nStart a conversation below.";
const HELP: &str =
    "Commands: /export (alias /save), /clear, /cancel, /help, /quit. Anything else is sent as a message.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Export,
    Clear,
    Cancel,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/export" | "/save" => Command::Export,
            "/clear" => Command::Clear,
            "/cancel" => Command::Cancel,
            "/help" | "/?" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Say(line.to_string()),
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn format_message(message: &Message) -> String {
    let label = if message.is_user() { "You" } else { "Bot" };
    let time = DateTime::from_timestamp_millis(message.ts)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());

    let mut out = format!("[{}] {}:", time, label);
    for line in message.text.lines() {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

/// Line-oriented front end: prints the transcript as it grows and maps input
/// lines onto controller operations.
pub async fn run(
    mut controller: ConversationController,
    export_dir: &Path
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!(
        "Chatting via the {} provider ({} bytes of prompt context)",
        controller.provider_name(),
        controller.prompt_context().as_str().len()
    );

    if controller.transcript().is_empty() {
        println!("{}", GREETING);
    } else {
        for message in controller.transcript() {
            println!("{}", format_message(message));
        }
    }
    println!("{}", HELP);

    loop {
        tokio::select! {
            reply = controller.next_response(), if controller.is_awaiting() => {
                if let Some(message) = reply {
                    println!("{}", format_message(&message));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed, leaving");
                    break;
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Help => println!("{}", HELP),
                    Command::Cancel => {
                        if controller.cancel_response() {
                            println!("(cancelled)");
                        }
                    }
                    Command::Export => {
                        match controller.export_transcript().and_then(|a| a.write_to(export_dir)) {
                            Ok(path) => println!("(saved to {})", path.display()),
                            Err(e) => {
                                error!("Export failed: {}", e);
                                println!("(export failed: {})", e);
                            }
                        }
                    }
                    Command::Clear => {
                        println!("{} [y/N]", CLEAR_CONFIRMATION_PROMPT);
                        let answer = lines.next_line().await?.unwrap_or_default();
                        let accepted = is_yes(&answer);
                        if controller.clear_conversation(&|_: &str| accepted) == ClearOutcome::Cleared {
                            println!("{}", GREETING);
                        }
                    }
                    Command::Say(text) => {
                        controller.set_input(&text);
                        match controller.submit_input() {
                            SubmitOutcome::Accepted { .. } => {
                                if let Some(message) = controller.transcript().last() {
                                    println!("{}", format_message(message));
                                }
                                println!("...");
                            }
                            SubmitOutcome::Rejected(RejectReason::Busy) => {
                                println!("(still waiting for the last reply; /cancel to abandon it)");
                            }
                            SubmitOutcome::Rejected(RejectReason::Empty) => {}
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_plain_text() {
        assert_eq!(Command::parse("/save"), Command::Export);
        assert_eq!(Command::parse(" /clear "), Command::Clear);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("hello /clear"), Command::Say("hello /clear".to_string()));
    }

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn indents_multiline_text_under_label() {
        let formatted = format_message(&Message::bot("first\nsecond", 0));
        let lines: Vec<_> = formatted.lines().collect();
        assert!(lines[0].ends_with("Bot:"));
        assert_eq!(&lines[1..], &["    first", "    second"]);
    }
}
