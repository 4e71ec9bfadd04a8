use portal_client::{AppError, AppState, Config, ConsoleFrontend, InputEvent, ModalMessage, ModalMode, Portal, SortColumn, UserForm, View, init_tracing, role_label};
use std::io::{BufRead, Write};
use std::sync::Arc;

const HELP: &str = "\
Commands:
  login <username> <password>
  register <username> <email> <password>
  logout
  me                                   show view and current user
  active                               show active users (admin)
  users                                show the user table (admin)
  sort <username|email|role>
  new                                  open the create dialog
  edit <id>                            open the edit dialog
  save <username> <email> [password] [admin|user]
  cancel                               close the dialog
  delete <id>
  config                               print the effective configuration
  help
  quit";

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name}");
    eprintln!("Reads commands from stdin; type `help` once started.");
}

enum Step {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args();
    let bin_name = args.next().unwrap_or_else(|| "portal".to_string());
    if args.next().is_some() {
        print_usage(&bin_name);
        std::process::exit(2);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);

    let portal = match Portal::from_config(config, Arc::new(ConsoleFrontend)) {
        Ok(portal) => portal,
        Err(err) => {
            eprintln!("Failed to start portal client: {err}");
            std::process::exit(1);
        }
    };

    match portal.auth().restore().await {
        Ok(true) => println!("Restored saved session."),
        Ok(false) => {}
        Err(err) => eprintln!("Saved session could not be restored: {err}"),
    }
    render(&portal.snapshot().await);

    loop {
        let Some(line) = read_line().await else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        portal.on_input(InputEvent::KeyDown);
        match run(&portal, &words).await {
            Ok(Step::Continue) => {}
            Ok(Step::Quit) => break,
            Err(err) => eprintln!("error: {err}"),
        }
    }
}

/// One line from stdin, or `None` at end of input.
async fn read_line() -> Option<String> {
    print!("> ");
    let _ = std::io::stdout().flush();

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    });

    line.await.ok().flatten()
}

async fn run(portal: &Portal, words: &[&str]) -> Result<Step, AppError> {
    match words {
        ["login", username, password] => {
            let result = portal.auth().login(username, password).await;
            render(&portal.snapshot().await);
            result?;
        }
        ["register", username, email, password] => {
            portal.auth().show_register().await;
            let result = portal.auth().register(username, email, password).await;
            render(&portal.snapshot().await);
            result?;
        }
        ["logout"] => {
            portal.auth().logout().await?;
            render(&portal.snapshot().await);
        }
        ["me"] => render(&portal.snapshot().await),
        ["active"] => render_active(&portal.snapshot().await),
        ["users"] => render_users(&portal.snapshot().await),
        ["sort", column] => {
            let column: SortColumn = column.parse().map_err(AppError::Validation)?;
            let sort = portal.admin().sort_users(column).await;
            println!("sorted by {} ({:?})", column, sort.direction);
            render_users(&portal.snapshot().await);
        }
        ["new"] => {
            portal.admin().open_create_modal().await;
            render_modal(&portal.snapshot().await);
        }
        ["edit", id] => {
            portal.admin().open_edit_modal(parse_id(id)?).await?;
            render_modal(&portal.snapshot().await);
        }
        ["save", username, email, rest @ ..] => {
            let form = form_from(&portal.snapshot().await, username, email, rest)?;
            let result = portal.admin().save_user(form).await;
            render_modal(&portal.snapshot().await);
            result?;
        }
        ["cancel"] => portal.admin().close_modal().await,
        ["delete", id] => {
            let id = parse_id(id)?;
            let state = portal.snapshot().await;
            let user = state.find_user(id).ok_or(AppError::UserNotFound(id))?;
            if portal.admin().delete_user(id, &user.username).await? {
                render_users(&portal.snapshot().await);
            }
        }
        ["config"] => match toml::to_string_pretty(portal.config()) {
            Ok(text) => print!("{text}"),
            Err(err) => eprintln!("Failed to render configuration: {err}"),
        },
        ["help"] => println!("{HELP}"),
        ["quit"] | ["exit"] => return Ok(Step::Quit),
        _ => eprintln!("Unknown command, type `help`."),
    }

    Ok(Step::Continue)
}

fn parse_id(text: &str) -> Result<i64, AppError> {
    text.parse().map_err(|_| AppError::Validation(format!("Not a user id: {text}")))
}

fn form_from(state: &AppState, username: &str, email: &str, rest: &[&str]) -> Result<UserForm, AppError> {
    let Some(modal) = state.modal.as_ref() else {
        return Err(AppError::Validation("Open a dialog with `new` or `edit` first".to_string()));
    };

    let (password, role) = match rest {
        [] => ("", None),
        [role @ ("admin" | "user")] => ("", Some(*role)),
        [password] => (*password, None),
        [password, role] => (*password, Some(*role)),
        _ => return Err(AppError::Validation("Too many arguments for save".to_string())),
    };

    let id = match modal.mode {
        ModalMode::Create => None,
        ModalMode::Edit { id } => Some(id),
    };

    Ok(UserForm {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        is_admin: role.map_or(modal.form.is_admin, |role| role == "admin"),
    })
}

fn render(state: &AppState) {
    match state.view {
        View::Auth(tab) => {
            println!("[auth: {tab:?}]");
            if let Some(error) = state.login_error.as_ref().or(state.register_error.as_ref()) {
                println!("  {error}");
            }
        }
        View::Workspace => {
            if let Some(user) = &state.current_user {
                let email = user.email.as_deref().unwrap_or("-");
                println!("[workspace] {} <{}> {}", user.username, email, role_label(user.is_admin));
            }
            if state.admin_section_visible {
                println!("  admin: {} users, {} active", state.users.len(), state.active_users.count());
            }
        }
    }
}

fn render_active(state: &AppState) {
    if let Some(error) = &state.active_users.error {
        println!("{error}");
        return;
    }
    println!("Active users: {}", state.active_users.count());
    for user in &state.active_users.users {
        println!("  {} <{}>", user.username, user.email);
    }
}

fn render_users(state: &AppState) {
    if !state.admin_section_visible {
        println!("No user table.");
        return;
    }
    for user in &state.displayed_users {
        println!("  {:>4}  {:<20} {:<30} {}", user.id, user.username, user.email, role_label(user.is_admin));
    }
}

fn render_modal(state: &AppState) {
    let Some(modal) = &state.modal else {
        return;
    };

    match modal.mode {
        ModalMode::Create => println!("[new user]"),
        ModalMode::Edit { id } => println!("[edit user {id}] {} <{}>", modal.form.username, modal.form.email),
    }
    if modal.role_selector_hidden {
        println!("  (own account: role cannot be changed)");
    }
    match &modal.message {
        Some(ModalMessage::Success(text)) => println!("  ok: {text}"),
        Some(ModalMessage::Error(text)) => println!("  error: {text}"),
        None => {}
    }
}
