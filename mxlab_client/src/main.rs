//! Interactive terminal client for the MX Lab assessment backend.
//!
//! Student flow:
//!   login                 prompt for credentials, receive assigned trials
//!   trials / open / click browse and reveal observations
//!   guess <metal>         submit the single predicted metal, then back to login
//!
//! Teacher flow (orthogonal, privilege-gated):
//!   teacher / unlock <password> / export / reset / confirm / cancel / close
//!
//! Talks to the backend at `MXLAB_API_BASE` (default http://127.0.0.1:5001).

mod api;
mod paths;

use std::io::{self, Write as _};
use std::path::PathBuf;

use mxlab::error::ExportError;
use mxlab::session::{AppState, Phase};
use mxlab::teacher::TeacherPanel;
use mxlab::trial::{ReagentCell, TrialContent, REAGENT_CATALOGUE};
use tracing::info;

use crate::api::{ApiClient, LoginForm, DEFAULT_API_BASE};
use crate::paths::ExportPaths;

fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn read_login_form() -> io::Result<Option<LoginForm>> {
    let Some(full_name) = prompt("Full Name: ")? else {
        return Ok(None);
    };
    let Some(id950) = prompt("950 Number (8 digits): ")? else {
        return Ok(None);
    };
    let Some(period) = prompt("Class Period (e.g: 2): ")? else {
        return Ok(None);
    };
    let Some(password) = prompt("Password: ")? else {
        return Ok(None);
    };
    Ok(Some(LoginForm {
        full_name,
        id950,
        period,
        password,
    }))
}

fn print_help() {
    println!("Student:");
    println!("  login                 Enter credentials and receive your trials");
    println!("  trials                List assigned trials");
    println!("  open <trial>          Open a trial and show its observations");
    println!("  click <reagent>       Reveal one reagent row of the open trial");
    println!("  guess <metal>         Submit your predicted metal symbol (e.g: Au); one attempt");
    println!("Teacher:");
    println!("  teacher               Open the teacher tools panel (locked)");
    println!("  unlock <password>     Unlock the tools");
    println!("  export                Download results.csv");
    println!("  reset                 Clear results and assignments (asks to confirm)");
    println!("  confirm | cancel      Resolve a pending reset confirmation");
    println!("  close                 Close the teacher panel (re-locks it)");
    println!("Other:");
    println!("  about | help | quit");
}

fn print_about() {
    println!("MX Lab Assessment");
    println!("Henry M. Gunn High School's Mellows Chem H MX Lab assessment client.");
    println!("Creator: Andersen Tanriverdi (andersentanriverdi@gmail.com)");
    println!("Special thanks: Nate Yoon, Doyoon Kim, Xiwen Liang, Madeleine Kang, Frank Zhang");
}

fn print_trials(app: &AppState) {
    let list = app.trial_list();
    if list.is_empty() {
        println!("No trials assigned.");
        return;
    }
    for (key, opened) in list {
        let marker = if opened { "[opened]" } else { "        " };
        println!("  {marker} {key}");
    }
    println!("Open one with: open <trial>");
}

fn print_trial_detail(app: &AppState, key: &str) {
    let Some(session) = app.session() else {
        return;
    };
    let Some(content) = session.trials.get(key) else {
        return;
    };
    println!("── {key} ──");
    match content {
        TrialContent::Text(text) => println!("{text}"),
        TrialContent::ReagentTable(_) => {
            for reagent in REAGENT_CATALOGUE {
                match app.reagent_cell(key, reagent) {
                    ReagentCell::Hidden => println!("  {reagent:<14} click to observe"),
                    ReagentCell::Revealed(text) => println!("  {reagent:<14} {text}"),
                }
            }
            println!("Reveal a row with: click <reagent>");
        }
    }
}

fn save_results(paths: &ExportPaths, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let path = paths.results_file();
    std::fs::write(&path, bytes).map_err(|e| ExportError::Save(e.to_string()))?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let base = std::env::var("MXLAB_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    let api = ApiClient::new(base.clone())?;
    let export_paths = ExportPaths::new();
    info!("talking to backend at {base}");

    let mut app = AppState::new();
    let mut panel = TeacherPanel::new();

    println!("MX Lab Assessment — type 'help' for commands.");
    loop {
        let Some(line) = prompt("mxlab> ")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match cmd {
            "login" => {
                if app.phase() == Phase::Trials {
                    println!("Already in a session; submit your guess to finish it.");
                    continue;
                }
                let Some(form) = read_login_form()? else {
                    break;
                };
                match api.login(&form).await {
                    Ok(session) => {
                        let count = session.trials.len();
                        app.begin_session(session);
                        println!("Logged in. {count} trial(s) assigned; type 'trials' to see them.");
                    }
                    Err(e) => println!("{e}"),
                }
            }
            "trials" => {
                if app.phase() != Phase::Trials {
                    println!("Log in first.");
                    continue;
                }
                print_trials(&app);
            }
            "open" => {
                if arg.is_empty() {
                    println!("Usage: open <trial>");
                    continue;
                }
                if app.open(arg).is_none() {
                    println!("No such trial: {arg}");
                    continue;
                }
                print_trial_detail(&app, arg);
            }
            "click" => {
                if arg.is_empty() {
                    println!("Usage: click <reagent>");
                    continue;
                }
                let Some(key) = app.selected().map(str::to_string) else {
                    println!("Open a trial first.");
                    continue;
                };
                if app.click_reagent(&key, arg).is_none() {
                    println!("Nothing to reveal: the open trial must be a reagent table and '{arg}' one of its catalogue rows.");
                    continue;
                }
                print_trial_detail(&app, &key);
            }
            "guess" => match app.begin_submit(arg) {
                Err(e) => println!("{e}"),
                Ok(pending) => match api.submit(&pending).await {
                    Ok(result) => {
                        println!("Your answer is {result}. Returning to login.");
                        app.submit_succeeded();
                    }
                    Err(e) => {
                        println!("{e}");
                        app.submit_failed();
                    }
                },
            },
            "teacher" => {
                panel.open();
                println!("Teacher tools: enter the password with 'unlock <password>'.");
            }
            "unlock" => {
                if !panel.is_open() {
                    println!("Open the teacher panel first: 'teacher'.");
                    continue;
                }
                // A bare `unlock` retries the retained password.
                if !arg.is_empty() {
                    panel.set_password(arg);
                }
                match panel.begin_authenticate() {
                    Err(e) => println!("{e}"),
                    Ok(password) => match api.teacher_auth(&password).await {
                        Ok(()) => {
                            panel.authenticated(true);
                            println!("Tools unlocked. Commands: export, reset, close.");
                        }
                        Err(e) => {
                            panel.authenticated(false);
                            println!("{e}");
                        }
                    },
                }
            }
            "export" => match panel.begin_export() {
                Err(e) => println!("{e}"),
                Ok(password) => {
                    let outcome = api.export_results(&password).await;
                    panel.export_finished();
                    match outcome.and_then(|bytes| save_results(&export_paths, &bytes)) {
                        Ok(path) => println!("Saved results to {}", path.display()),
                        Err(e) => println!("{e}"),
                    }
                }
            },
            "reset" => {
                if panel.request_reset() {
                    println!("This will clear results.csv and reset all active 950 assignments.");
                    println!("Type 'confirm' to proceed, or 'cancel'.");
                } else {
                    println!("Unlock teacher tools first.");
                }
            }
            "confirm" => match panel.confirm_reset() {
                Err(e) => println!("{e}"),
                Ok(password) => {
                    let outcome = api.reset_all(&password).await;
                    panel.reset_finished();
                    match outcome {
                        Ok(()) => println!("Results cleared and 950s reset."),
                        Err(e) => println!("{e}"),
                    }
                }
            },
            "cancel" => {
                panel.cancel_reset();
                println!("Reset cancelled.");
            }
            "close" => {
                panel.close();
                println!("Teacher tools closed.");
            }
            "about" => print_about(),
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => println!("Unknown command; type 'help'."),
        }
    }

    Ok(())
}
