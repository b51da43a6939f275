//! The interactive loop.

use anyhow::Result;
use colored::Colorize;
use ragchat_application::{ChatApp, SubmitOutcome};
use ragchat_core::transcript::SubmitRejection;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use crate::command::{self, Command};
use crate::helper::CliHelper;
use crate::render;

pub async fn run(app: &mut ChatApp) -> Result<()> {
    app.start().await;

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));
    offer_sessions(&mut rl, app);

    println!("{}", render::banner());
    print_lines(render::identity(app.user()));
    println!(
        "{}",
        "Type a message to start chatting, /help for commands, or 'quit' to exit.".bright_black()
    );
    print_lines(render::home(app.auth().is_anonymous()));

    loop {
        let prompt = if app.view().is_home() { ">> " } else { "> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let command = match command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{}", e.to_string().yellow());
                        continue;
                    }
                };
                let _ = rl.add_history_entry(line.as_str());

                if command == Command::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                handle(app, command).await;
                offer_sessions(&mut rl, app);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn handle(app: &mut ChatApp, command: Command) {
    match command {
        Command::Say(text) if app.view().is_home() => start_chat(app, Some(&text)).await,
        Command::Say(text) => send(app, &text).await,
        Command::New(text) => start_chat(app, text.as_deref()).await,
        Command::Home => {
            app.select_home();
            print_lines(render::home(app.auth().is_anonymous()));
        }
        Command::Sessions => {
            app.sync_sessions().await;
            print_lines(render::sidebar(app));
        }
        Command::Refresh => {
            app.refresh_sessions().await;
            print_lines(render::sidebar(app));
        }
        Command::Open(selector) => {
            app.sync_sessions().await;
            let Some(session_id) = app.sessions().resolve(&selector).map(str::to_string) else {
                println!("{}", format!("No chat '{selector}'. Try /sessions.").yellow());
                return;
            };
            app.select_session(&session_id).await;
            print_chat(app);
        }
        Command::Delete(selector) => {
            app.sync_sessions().await;
            let Some(session_id) = app.sessions().resolve(&selector).map(str::to_string) else {
                println!("{}", format!("No chat '{selector}'. Try /sessions.").yellow());
                return;
            };
            match app.delete_session(&session_id).await {
                Ok(()) => {
                    println!("{}", "Chat deleted.".green());
                    print_lines(render::sidebar(app));
                }
                Err(e) => println!("{}", e.user_message().red()),
            }
        }
        Command::WhoAmI => {
            print_lines(render::identity(app.user()));
            if let Some(user) = app.user() {
                println!("{}", format!("id: {}", user.id).bright_black());
            }
        }
        Command::Login { email } => {
            let Some(password) = read_password("Password: ") else {
                return;
            };
            match app.login(&email, &password).await {
                Ok(()) => signed_in(app),
                Err(e) => println!("{}", e.user_message().red()),
            }
        }
        Command::Register { email, name } => {
            let Some(password) = read_password("Password: ") else {
                return;
            };
            let Some(confirm) = read_password("Password (again): ") else {
                return;
            };
            if password != confirm {
                println!("{}", "Passwords don't match".red());
                return;
            }
            match app.register(&email, &password, &name).await {
                Ok(()) => signed_in(app),
                Err(e) => println!("{}", e.user_message().red()),
            }
        }
        Command::Logout => {
            if app.auth().is_anonymous() {
                println!("{}", "Not signed in.".yellow());
                return;
            }
            app.logout().await;
            println!("{}", "Signed out.".green());
            print_lines(render::identity(app.user()));
            print_lines(render::home(true));
        }
        Command::Status => print_lines(render::status(&app.status().await)),
        Command::Help => print_lines(render::help()),
        Command::Quit => {}
    }
}

async fn start_chat(app: &mut ChatApp, text: Option<&str>) {
    let has_text = text.is_some_and(|t| !t.trim().is_empty());
    if has_text {
        println!("{}", "Thinking...".bright_black());
    }
    if app.new_chat(text).await {
        print_chat(app);
    } else {
        println!("{}", "Could not start a new chat.".red());
    }
}

async fn send(app: &mut ChatApp, text: &str) {
    println!("{}", "Thinking...".bright_black());
    match app.submit(text).await {
        SubmitOutcome::Answered { placeholder_id } | SubmitOutcome::Failed { placeholder_id } => {
            let reply = app
                .transcript()
                .messages()
                .iter()
                .find(|m| m.id == placeholder_id);
            if let Some(reply) = reply {
                print_lines(render::message(reply));
            }
        }
        SubmitOutcome::Rejected(SubmitRejection::Busy) => {
            println!("{}", "Still waiting for the previous reply.".yellow());
        }
        SubmitOutcome::Rejected(rejection) => {
            tracing::debug!(?rejection, "Prompt not sent");
        }
        SubmitOutcome::Discarded => {}
    }
}

/// Keeps `/open` and `/delete` completion in step with the sidebar.
fn offer_sessions(rl: &mut Editor<CliHelper, DefaultHistory>, app: &ChatApp) {
    if let Some(helper) = rl.helper_mut() {
        helper.set_sessions(&app.session_rows());
    }
}

fn print_chat(app: &ChatApp) {
    if let Some(session) = app
        .view()
        .active_session_id()
        .and_then(|id| app.sessions().sessions().iter().find(|s| s.id == id))
    {
        println!("{}", format!("--- {} ---", session.title).bright_magenta());
    }
    print_lines(render::transcript(app.transcript()));
}

fn signed_in(app: &ChatApp) {
    if let Some(user) = app.user() {
        println!(
            "{}",
            format!("Welcome, {}!", user.display_name()).bright_green()
        );
    }
    print_lines(render::sidebar(app));
}

fn read_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Some(password),
        Err(e) => {
            eprintln!("{}", format!("Could not read password: {e}").red());
            None
        }
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
