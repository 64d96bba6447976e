// src/console.rs
//! Terminal front-end for a counseling session.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::message::Role;
use crate::services::relay_client::RelayClient;
use crate::services::topics::TOPICS_PER_SESSION;
use crate::session::{Message, Phase, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewSession,
    Download,
    ToggleRecording,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "/new" => Some(Command::NewSession),
        "/download" => Some(Command::Download),
        "/record" => Some(Command::ToggleRecording),
        "/help" => Some(Command::Help),
        "/quit" | "/exit" => Some(Command::Quit),
        _ => None,
    }
}

const HELP: &str = "Commands: /new (start over), /download (save transcript), /record (toggle mic), /quit";

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

fn render(message: &Message) {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "counselor",
        Role::System => "session",
    };
    println!(
        "[{}] {}: {}",
        message.timestamp.as_deref().unwrap_or("--"),
        who,
        message.content
    );
}

pub async fn run(relay: RelayClient, out_dir: PathBuf) -> Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new();

    println!("Harmony - Couples Counseling Assistant");
    println!("{HELP}");

    loop {
        match session.phase() {
            Phase::Setup => {
                let Some(first) = prompt(&mut input, "First partner's name: ").await? else {
                    return Ok(());
                };
                let Some(second) = prompt(&mut input, "Second partner's name: ").await? else {
                    return Ok(());
                };
                session.set_names(first.trim(), second.trim());
                match session.start() {
                    Ok(topics) => {
                        println!("\nSelect a topic to discuss:");
                        for (i, topic) in topics.iter().enumerate() {
                            println!("  {}. {}\n     {}", i + 1, topic.category, topic.first_question());
                        }
                    }
                    Err(e) => println!("! {e}"),
                }
            }
            Phase::TopicSelection => {
                let Some(line) = prompt(&mut input, "Topic number: ").await? else {
                    return Ok(());
                };
                match parse_command(&line) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::NewSession) => {
                        session.new_session();
                        continue;
                    }
                    Some(_) => {
                        println!("{HELP}");
                        continue;
                    }
                    None => {}
                }
                let selected = line
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .map(|n| session.select_topic(n - 1));
                match selected {
                    Some(Ok(seed)) => render(seed),
                    Some(Err(e)) => println!("! {e}"),
                    None => println!("! enter a number between 1 and {TOPICS_PER_SESSION}"),
                }
            }
            Phase::Conversation => {
                let label = if session.is_recording() { "(rec) > " } else { "> " };
                let Some(line) = prompt(&mut input, label).await? else {
                    return Ok(());
                };
                match parse_command(&line) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::NewSession) => session.new_session(),
                    Some(Command::Download) => match session.download(&out_dir).await {
                        Ok(path) => println!("saved {}", path.display()),
                        Err(e) => println!("! {e}"),
                    },
                    Some(Command::ToggleRecording) => {
                        let on = session.toggle_recording();
                        println!("recording {}", if on { "on" } else { "off" });
                    }
                    Some(Command::Help) => println!("{HELP}"),
                    None => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match session.submit(&relay, &line).await {
                            Ok(reply) => render(reply),
                            Err(e) => println!("! {e}"),
                        }
                    }
                }
            }
        }
    }
}
